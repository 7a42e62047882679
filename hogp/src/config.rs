use embassy_time::Duration;
use usbd_hid::descriptor::{KeyboardReport, SerializedDescriptor as _};

use crate::hid::HidInformation;

/// Minimal interval between two input report notifications
pub const MIN_REPORT_INTERVAL: Duration = Duration::from_millis(12);

/// Config of a single report channel.
///
/// `len == 0` means the channel is absent and no characteristic is created for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportConfig {
    /// Report id written to the report reference descriptor
    pub id: u8,
    /// Declared report length in bytes, at most `MAX_REPORT_LEN`
    pub len: usize,
}

impl ReportConfig {
    pub const fn new(id: u8, len: usize) -> Self {
        Self { id, len }
    }

    pub const fn absent() -> Self {
        Self { id: 0, len: 0 }
    }

    pub const fn is_present(&self) -> bool {
        self.len > 0
    }
}

/// Config for the HID service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HidServiceConfig<'a> {
    /// HID report descriptor
    pub report_map: &'a [u8],
    pub hid_info: HidInformation,
    pub input: ReportConfig,
    pub output: ReportConfig,
    pub feature: ReportConfig,
    /// Expose the protocol mode characteristic, required by hosts which use boot protocol
    pub boot_protocol: bool,
}

impl<'a> HidServiceConfig<'a> {
    pub fn new(report_map: &'a [u8]) -> Self {
        Self {
            report_map,
            hid_info: HidInformation::default(),
            input: ReportConfig::absent(),
            output: ReportConfig::absent(),
            feature: ReportConfig::absent(),
            boot_protocol: false,
        }
    }
}

impl HidServiceConfig<'static> {
    /// A boot compatible keyboard: 8-byte input report and 1-byte LED output report
    pub fn keyboard() -> Self {
        Self {
            report_map: KeyboardReport::desc(),
            hid_info: HidInformation::default(),
            input: ReportConfig::new(0, 8),
            output: ReportConfig::new(0, 1),
            feature: ReportConfig::absent(),
            boot_protocol: true,
        }
    }
}

/// Preferred connection interval range, in units of 1.25ms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionInterval {
    pub min: u16,
    pub max: u16,
}

/// Config for pacing input report notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacingConfig {
    /// Delay between two input report notifications
    pub report_interval: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            report_interval: Duration::from_millis(20),
        }
    }
}

impl PacingConfig {
    /// Minimal connection interval allowed by Bluetooth LE, 7.5ms
    const MIN_CONNECTION_INTERVAL: u16 = 6;
    /// Maximal connection interval allowed by Bluetooth LE, 4s
    const MAX_CONNECTION_INTERVAL: u16 = 3200;

    pub fn new(report_interval: Duration) -> Self {
        if report_interval < MIN_REPORT_INTERVAL {
            warn!(
                "Report interval {}ms is too short, use {}ms",
                report_interval.as_millis(),
                MIN_REPORT_INTERVAL.as_millis()
            );
        }
        Self { report_interval }
    }

    /// The report interval, raised to `MIN_REPORT_INTERVAL` if it's set lower
    pub fn interval(&self) -> Duration {
        self.report_interval.max(MIN_REPORT_INTERVAL)
    }

    /// Connection interval range which lets every report go out without queueing:
    /// min is half of the report interval, max is the report interval
    pub fn preferred_connection_interval(&self) -> ConnectionInterval {
        let to_units = |us: u64| {
            u16::try_from(us / 1250)
                .unwrap_or(Self::MAX_CONNECTION_INTERVAL)
                .clamp(Self::MIN_CONNECTION_INTERVAL, Self::MAX_CONNECTION_INTERVAL)
        };
        let interval_us = self.interval().as_micros();
        let max = to_units(interval_us);
        let min = to_units(interval_us / 2).min(max);
        ConnectionInterval { min, max }
    }
}
