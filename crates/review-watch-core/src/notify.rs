use crate::error::Result;

/// Outbound messaging capability: deliver `text` to `chat_id`.
pub trait MessageChannel {
    fn send(&self, chat_id: &str, text: &str) -> Result<()>;
}

impl<C: MessageChannel + ?Sized> MessageChannel for Box<C> {
    fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        (**self).send(chat_id, text)
    }
}

/// Sends status messages and swallows delivery failures.
///
/// A message that fails to go out is logged and dropped; the poll loop
/// never sees the error.
pub struct Notifier<C> {
    channel: C,
}

impl<C: MessageChannel> Notifier<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Returns whether the message was delivered, for logging by the caller.
    pub fn notify(&self, chat_id: &str, text: &str) -> bool {
        match self.channel.send(chat_id, text) {
            Ok(()) => {
                tracing::debug!(chat_id, "message sent");
                true
            }
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "message not sent");
                false
            }
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recording {
        sent: RefCell<Vec<(String, String)>>,
        fail: bool,
    }

    impl MessageChannel for Recording {
        fn send(&self, chat_id: &str, text: &str) -> Result<()> {
            self.sent
                .borrow_mut()
                .push((chat_id.to_string(), text.to_string()));
            if self.fail {
                Err(WatchError::Delivery("Forbidden: bot was blocked by the user".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn delegates_to_channel() {
        let notifier = Notifier::new(Recording::default());
        assert!(notifier.notify("42", "hi"));
        assert_eq!(
            *notifier.channel().sent.borrow(),
            vec![("42".to_string(), "hi".to_string())]
        );
    }

    #[test]
    fn delivery_failure_is_swallowed() {
        let notifier = Notifier::new(Recording {
            fail: true,
            ..Default::default()
        });
        assert!(!notifier.notify("42", "hi"));
        assert_eq!(notifier.channel().sent.borrow().len(), 1);
    }

    #[test]
    fn boxed_channel_is_a_channel() {
        let boxed: Box<dyn MessageChannel> = Box::new(Recording::default());
        let notifier = Notifier::new(boxed);
        assert!(notifier.notify("42", "hi"));
    }
}
