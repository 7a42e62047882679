use super::gatt::Properties;
use crate::config::ReportConfig;
use crate::hid::{HidError, MAX_REPORT_LEN, ReportReference, ReportType};

/// A report buffer with fixed length, plus its report reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportChannel {
    buffer: [u8; MAX_REPORT_LEN],
    len: usize,
    reference: ReportReference,
    // Encoded `reference`, kept so the descriptor value can be borrowed
    reference_raw: [u8; 2],
}

impl ReportChannel {
    /// Create the channel for `report_type`, `None` if the config declares it absent
    pub(crate) fn new(report_type: ReportType, config: &ReportConfig) -> Result<Option<Self>, HidError> {
        if !config.is_present() {
            return Ok(None);
        }
        if config.len > MAX_REPORT_LEN {
            error!(
                "{:?} report length {} exceeds {} bytes",
                report_type, config.len, MAX_REPORT_LEN
            );
            return Err(HidError::ReportTooLong(report_type));
        }
        let reference = ReportReference::new(config.id, report_type);
        Ok(Some(Self {
            buffer: [0; MAX_REPORT_LEN],
            len: config.len,
            reference,
            reference_raw: reference.to_bytes(),
        }))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn reference(&self) -> ReportReference {
        self.reference
    }

    pub(crate) fn reference_bytes(&self) -> &[u8] {
        &self.reference_raw
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Input reports are notified, output and feature reports are written by the host
    pub(crate) fn properties(&self) -> Properties {
        let props = Properties::new().with_read(true);
        match self.reference.report_type {
            ReportType::Input => props.with_notify(true),
            ReportType::Output => props.with_write(true).with_write_without_response(true),
            ReportType::Feature => props.with_write(true),
        }
    }

    /// Replace the buffer content, `data` must have exactly the declared length
    pub(crate) fn store(&mut self, data: &[u8]) -> Result<(), HidError> {
        if data.len() != self.len {
            return Err(HidError::LengthMismatch {
                expected: self.len,
                actual: data.len(),
            });
        }
        self.buffer[..self.len].copy_from_slice(data);
        Ok(())
    }

    /// Copy the buffer content into `dest`, return the number of bytes copied
    pub(crate) fn load(&self, dest: &mut [u8]) -> Result<usize, HidError> {
        let dest = dest.get_mut(..self.len).ok_or(HidError::BufferTooSmall)?;
        dest.copy_from_slice(self.as_slice());
        Ok(self.len)
    }
}
