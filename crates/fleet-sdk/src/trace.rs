/// Lightweight trace abstraction used by every fleet component for
/// diagnostic output, independent of how the output is finally emitted.
pub trait TraceWriter: Send + Sync {
    /// Log an informational message.
    fn info(&self, message: &str);

    /// Log a verbose / debug message.
    fn verbose(&self, message: &str);

    /// Log a warning message.
    fn warning(&self, message: &str) {
        self.info(&format!("[warning] {message}"));
    }

    /// Log an error message.
    fn error(&self, message: &str) {
        self.info(&format!("[error] {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl TraceWriter for Recorder {
        fn info(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }

        fn verbose(&self, _message: &str) {}
    }

    #[test]
    fn default_levels_prefix_info() {
        let recorder = Recorder::default();
        recorder.warning("low disk");
        recorder.error("gone");
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["[warning] low disk".to_string(), "[error] gone".to_string()]
        );
    }
}
