use std::fmt;
use std::ops::Deref;

/// A bridge message body owned by the receiver.
///
/// Engine callbacks hand us borrowed strings that are only valid for the
/// duration of the callback. A `Payload` is always a copy made inside that
/// callback and moved into the host handler, which may keep it as long as
/// it likes. Nothing is freed on a timer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Payload(String);

impl Payload {
    /// Copy a borrowed engine string.
    pub fn copy_from(borrowed: &str) -> Self {
        Self(borrowed.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Deref for Payload {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_outlives_source_buffer() {
        let payload = {
            let engine_buffer = String::from("{\"rpc\":1}");
            Payload::copy_from(&engine_buffer)
        };
        assert_eq!(payload.as_str(), "{\"rpc\":1}");
    }

    #[test]
    fn debug_does_not_print_contents() {
        let p = Payload::copy_from("secret");
        assert_eq!(format!("{p:?}"), "Payload(6 bytes)");
    }
}
