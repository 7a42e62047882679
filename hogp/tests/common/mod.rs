#![allow(dead_code)]

use hogp::{AttributeId, HidServiceConfig, Notifier, NotifyError, ReportConfig};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A minimal keyboard report map: usage page, usage, collection, end collection
pub const REPORT_MAP: &[u8] = &[0x05, 0x01, 0x09, 0x06, 0xA1, 0x01, 0xC0];

/// Records every notification instead of sending it
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Vec<(AttributeId, Vec<u8>)>,
    /// When set, every notification fails with this error
    pub fail_with: Option<NotifyError>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, id: AttributeId, value: &[u8]) -> Result<(), NotifyError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.sent.push((id, value.to_vec()));
        Ok(())
    }
}

pub fn input_only_config() -> HidServiceConfig<'static> {
    HidServiceConfig {
        input: ReportConfig::new(1, 8),
        ..HidServiceConfig::new(REPORT_MAP)
    }
}

pub fn full_config() -> HidServiceConfig<'static> {
    HidServiceConfig {
        input: ReportConfig::new(1, 8),
        output: ReportConfig::new(1, 1),
        feature: ReportConfig::new(2, 4),
        boot_protocol: true,
        ..HidServiceConfig::new(REPORT_MAP)
    }
}
