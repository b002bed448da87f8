//! Message arguments accepted by the leveled log methods

use std::fmt;

/// Anything a leveled log method accepts as its message.
///
/// Single strings are taken as-is; sequences of parts are joined with one
/// space, so `logger.info(["user", "42", "logged in"])` logs
/// `user 42 logged in`.
pub trait IntoMessage {
    fn into_message(self) -> String;
}

fn join_parts<S: AsRef<str>>(parts: &[S]) -> String {
    let mut message = String::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            message.push(' ');
        }
        message.push_str(part.as_ref());
    }
    message
}

impl IntoMessage for &str {
    fn into_message(self) -> String {
        self.to_string()
    }
}

impl IntoMessage for String {
    fn into_message(self) -> String {
        self
    }
}

impl IntoMessage for &String {
    fn into_message(self) -> String {
        self.clone()
    }
}

impl IntoMessage for fmt::Arguments<'_> {
    fn into_message(self) -> String {
        match self.as_str() {
            Some(literal) => literal.to_string(),
            None => self.to_string(),
        }
    }
}

impl<S: AsRef<str>, const N: usize> IntoMessage for [S; N] {
    fn into_message(self) -> String {
        join_parts(&self)
    }
}

impl<S: AsRef<str>> IntoMessage for &[S] {
    fn into_message(self) -> String {
        join_parts(self)
    }
}

impl<S: AsRef<str>> IntoMessage for Vec<S> {
    fn into_message(self) -> String {
        join_parts(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_strings() {
        assert_eq!("plain".into_message(), "plain");
        assert_eq!(String::from("owned").into_message(), "owned");
        assert_eq!((&String::from("borrowed")).into_message(), "borrowed");
    }

    #[test]
    fn test_parts_joined_with_single_space() {
        assert_eq!(["user", "42", "logged in"].into_message(), "user 42 logged in");
        assert_eq!(vec![String::from("a"), String::from("b")].into_message(), "a b");

        let parts = ["x", "y"];
        assert_eq!(parts[..].into_message(), "x y");
    }

    #[test]
    fn test_empty_parts() {
        let none: [&str; 0] = [];
        assert_eq!(none.into_message(), "");
        assert_eq!(["", "tail"].into_message(), " tail");
    }

    #[test]
    fn test_format_arguments() {
        assert_eq!(format_args!("static").into_message(), "static");
        assert_eq!(format_args!("{} + {} = {}", 1, 2, 3).into_message(), "1 + 2 = 3");
    }
}
