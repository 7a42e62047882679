//! HID types shared by the GATT service and the application.

use bitfield_struct::bitfield;
use serde::{Deserialize, Serialize};
use strum::FromRepr;

use crate::ble::gatt::AttributeId;

/// Maximum length of a single report, in bytes
pub const MAX_REPORT_LEN: usize = 64;

/// Maximum length of a GATT attribute value, which bounds the report map
pub const MAX_REPORT_MAP_LEN: usize = 512;

/// Report type, as encoded in the second byte of the report reference descriptor
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Input = 0x01,
    Output = 0x02,
    Feature = 0x03,
}

/// Content of the report reference descriptor attached to every report characteristic
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportReference {
    pub report_id: u8,
    pub report_type: ReportType,
}

impl ReportReference {
    pub const fn new(report_id: u8, report_type: ReportType) -> Self {
        Self { report_id, report_type }
    }

    /// Encode as `[report_id, report_type]`
    pub const fn to_bytes(self) -> [u8; 2] {
        [self.report_id, self.report_type as u8]
    }

    pub fn from_bytes(raw: [u8; 2]) -> Option<Self> {
        ReportType::from_repr(raw[1]).map(|report_type| Self::new(raw[0], report_type))
    }
}

/// Protocol mode selected by the host.
///
/// Boot mode means the host expects the simplified boot keyboard/mouse reports.
/// The service only tracks the mode, interpreting it is up to the application.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolMode {
    Boot = 0x00,
    #[default]
    Report = 0x01,
}

impl ProtocolMode {
    /// Attribute value of the protocol mode characteristic
    pub(crate) fn as_bytes(self) -> &'static [u8] {
        match self {
            ProtocolMode::Boot => &[0x00],
            ProtocolMode::Report => &[0x01],
        }
    }
}

impl TryFrom<u8> for ProtocolMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ProtocolMode::from_repr(value).ok_or(value)
    }
}

/// Commands the host can write to the HID control point
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlPointCommand {
    Suspend = 0x00,
    ExitSuspend = 0x01,
}

/// Flags field of the HID information characteristic
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq, Serialize, Deserialize)]
pub struct HidInfoFlags {
    /// Device can send a wake signal to the host
    #[bits(1)]
    pub remote_wake: bool,
    /// Device advertises when bonded but not connected
    #[bits(1)]
    pub normally_connectable: bool,
    #[bits(6)]
    _reserved: u8,
}

/// HID information characteristic value
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidInformation {
    /// Version of the HID specification, in BCD
    pub bcd_hid: u16,
    pub country_code: u8,
    pub flags: HidInfoFlags,
}

impl Default for HidInformation {
    fn default() -> Self {
        Self {
            bcd_hid: 0x0111,
            country_code: 0,
            flags: HidInfoFlags::new().with_remote_wake(true).with_normally_connectable(true),
        }
    }
}

impl HidInformation {
    /// Encode as the 4-byte characteristic value, `bcd_hid` is little endian
    pub fn to_bytes(&self) -> [u8; 4] {
        let [lo, hi] = self.bcd_hid.to_le_bytes();
        [lo, hi, self.country_code, self.flags.into_bits()]
    }
}

/// Errors reported by the BLE stack when a notification cannot be delivered
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotifyError {
    /// No host is connected
    NotConnected,
    /// The host didn't enable notifications in the CCCD
    NotSubscribed,
    /// The stack's notification queue is full
    Busy,
}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NotifyError::NotConnected => write!(f, "not connected"),
            NotifyError::NotSubscribed => write!(f, "notifications not enabled by host"),
            NotifyError::Busy => write!(f, "notification queue busy"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    /// A report channel is declared longer than `MAX_REPORT_LEN`
    ReportTooLong(ReportType),
    EmptyReportMap,
    ReportMapTooLong,
    /// The attribute table can't hold another entry
    LayoutFull,
    /// The report channel isn't configured
    ChannelAbsent(ReportType),
    /// Report length differs from the declared channel length
    LengthMismatch { expected: usize, actual: usize },
    /// Destination buffer is shorter than the report
    BufferTooSmall,
    /// The BLE stack refused the notification
    Notify(NotifyError),
}

impl core::fmt::Display for HidError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HidError::ReportTooLong(ty) => write!(f, "{:?} report exceeds {} bytes", ty, MAX_REPORT_LEN),
            HidError::EmptyReportMap => write!(f, "report map is empty"),
            HidError::ReportMapTooLong => write!(f, "report map exceeds {} bytes", MAX_REPORT_MAP_LEN),
            HidError::LayoutFull => write!(f, "attribute table is full"),
            HidError::ChannelAbsent(ty) => write!(f, "{:?} report is not configured", ty),
            HidError::LengthMismatch { expected, actual } => {
                write!(f, "report length {} doesn't match declared length {}", actual, expected)
            }
            HidError::BufferTooSmall => write!(f, "destination buffer too small"),
            HidError::Notify(e) => write!(f, "notify failed: {}", e),
        }
    }
}

impl From<NotifyError> for HidError {
    fn from(e: NotifyError) -> Self {
        HidError::Notify(e)
    }
}

/// Outbound half of the GATT boundary: the BLE stack pushes attribute values to the host.
pub trait Notifier {
    /// Send a notification carrying `value` for the attribute `id`
    fn notify(&mut self, id: AttributeId, value: &[u8]) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for &mut T {
    fn notify(&mut self, id: AttributeId, value: &[u8]) -> Result<(), NotifyError> {
        (**self).notify(id, value)
    }
}
