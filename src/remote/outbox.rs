//! Pending remote writes.
//!
//! Holds the latest value per outbound path until a push succeeds.  A
//! value staged while an older one is still pending replaces it, so a
//! slow or failing link never builds a backlog of stale progress values.

use log::{debug, warn};

use crate::app::ports::RemotePort;
use crate::error::TransportError;

use super::paths::RemotePath;

/// Flush order.  Progress goes before status so a client never sees the
/// committed status with a stale percentage after it.
const ORDER: [RemotePath; 3] = [RemotePath::Progress, RemotePath::Status, RemotePath::Network];

#[derive(Debug, Default, Clone)]
pub struct Outbox {
    pending: [Option<i64>; ORDER.len()],
}

fn slot(path: RemotePath) -> Option<usize> {
    ORDER.iter().position(|p| *p == path)
}

impl Outbox {
    pub const fn new() -> Self {
        Self {
            pending: [None; ORDER.len()],
        }
    }

    /// Queue `value` for `path`, replacing any unsent value.
    pub fn stage(&mut self, path: RemotePath, value: i64) {
        match slot(path) {
            Some(i) => self.pending[i] = Some(value),
            None => warn!("Outbox: {} is not writable", path.full()),
        }
    }

    pub fn pending(&self, path: RemotePath) -> Option<i64> {
        slot(path).and_then(|i| self.pending[i])
    }

    pub fn len(&self) -> usize {
        self.pending.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push every pending value in order.  Stops at the first failure and
    /// keeps it (and everything after it) for the next flush.
    pub fn flush(
        &mut self,
        remote: &mut impl RemotePort,
    ) -> Result<usize, (RemotePath, TransportError)> {
        let mut sent = 0;
        for (path, entry) in ORDER.iter().zip(self.pending.iter_mut()) {
            let Some(value) = *entry else { continue };
            match remote.push(*path, value) {
                Ok(()) => {
                    debug!("Outbox: {} = {}", path.full(), value);
                    *entry = None;
                    sent += 1;
                }
                Err(e) => return Err((*path, e)),
            }
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        writes: std::vec::Vec<(RemotePath, i64)>,
        fail_on: Option<RemotePath>,
    }

    impl RemotePort for Recorder {
        fn push(&mut self, path: RemotePath, value: i64) -> Result<(), TransportError> {
            if self.fail_on == Some(path) {
                return Err(TransportError::Timeout);
            }
            self.writes.push((path, value));
            Ok(())
        }
    }

    #[test]
    fn latest_value_wins() {
        let mut ob = Outbox::new();
        ob.stage(RemotePath::Progress, 10);
        ob.stage(RemotePath::Progress, 20);
        assert_eq!(ob.len(), 1);
        let mut r = Recorder::default();
        assert_eq!(ob.flush(&mut r), Ok(1));
        assert_eq!(r.writes, [(RemotePath::Progress, 20)]);
        assert!(ob.is_empty());
    }

    #[test]
    fn progress_flushes_before_status() {
        let mut ob = Outbox::new();
        ob.stage(RemotePath::Network, -60);
        ob.stage(RemotePath::Status, 2);
        ob.stage(RemotePath::Progress, 100);
        let mut r = Recorder::default();
        ob.flush(&mut r).unwrap();
        assert_eq!(
            r.writes,
            [
                (RemotePath::Progress, 100),
                (RemotePath::Status, 2),
                (RemotePath::Network, -60)
            ]
        );
    }

    #[test]
    fn failure_keeps_remaining_values() {
        let mut ob = Outbox::new();
        ob.stage(RemotePath::Progress, 100);
        ob.stage(RemotePath::Status, 1);
        let mut r = Recorder {
            fail_on: Some(RemotePath::Status),
            ..Recorder::default()
        };
        assert_eq!(
            ob.flush(&mut r),
            Err((RemotePath::Status, TransportError::Timeout))
        );
        assert_eq!(ob.pending(RemotePath::Progress), None);
        assert_eq!(ob.pending(RemotePath::Status), Some(1));

        r.fail_on = None;
        assert_eq!(ob.flush(&mut r), Ok(1));
        assert!(ob.is_empty());
    }

    #[test]
    fn inbound_paths_are_not_staged() {
        let mut ob = Outbox::new();
        ob.stage(RemotePath::Duration, 5);
        assert!(ob.is_empty());
    }
}
