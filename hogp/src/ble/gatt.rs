//! Attribute table of the HID service, as handed to the GATT server.

use bitfield_struct::bitfield;
use heapless::Vec;

use super::constants::{BleCharacteristics, BleDescriptor};
use crate::hid::{HidError, ReportType};

/// Upper bound of attributes in the HID service: 3 fixed characteristics, protocol mode,
/// and a characteristic plus a report reference descriptor for each of the 3 report types.
pub const MAX_ATTRIBUTES: usize = 10;

/// Identity of an attribute inside the HID service.
///
/// The BLE stack maps its own handles to these ids when it forwards reads and writes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttributeId {
    ReportMap,
    HidInformation,
    ControlPoint,
    ProtocolMode,
    Report(ReportType),
    ReportReference(ReportType),
}

/// Characteristic properties, bit layout follows the characteristic declaration
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]
pub struct Properties {
    #[bits(1)]
    pub broadcast: bool,
    #[bits(1)]
    pub read: bool,
    #[bits(1)]
    pub write_without_response: bool,
    #[bits(1)]
    pub write: bool,
    #[bits(1)]
    pub notify: bool,
    #[bits(1)]
    pub indicate: bool,
    #[bits(2)]
    _reserved: u8,
}

impl Properties {
    pub fn readable(&self) -> bool {
        self.read()
    }

    pub fn writable(&self) -> bool {
        self.write() || self.write_without_response()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttributeKind {
    Characteristic,
    /// Descriptor attached to the characteristic right before it in the layout
    Descriptor,
}

/// One entry of the attribute table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeDescriptor {
    pub kind: AttributeKind,
    pub uuid: u16,
    pub id: AttributeId,
    pub properties: Properties,
    /// Maximum length of the attribute value
    pub max_len: usize,
}

impl AttributeDescriptor {
    pub(crate) fn characteristic(
        uuid: BleCharacteristics,
        id: AttributeId,
        properties: Properties,
        max_len: usize,
    ) -> Self {
        Self {
            kind: AttributeKind::Characteristic,
            uuid: uuid.uuid(),
            id,
            properties,
            max_len,
        }
    }

    pub(crate) fn report_reference(report_type: ReportType) -> Self {
        Self {
            kind: AttributeKind::Descriptor,
            uuid: BleDescriptor::ReportReference.uuid(),
            id: AttributeId::ReportReference(report_type),
            properties: Properties::new().with_read(true),
            max_len: 2,
        }
    }
}

/// Ordered attribute table of the HID service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceLayout {
    entries: Vec<AttributeDescriptor, MAX_ATTRIBUTES>,
}

impl ServiceLayout {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub(crate) fn push(&mut self, entry: AttributeDescriptor) -> Result<(), HidError> {
        self.entries.push(entry).map_err(|_| {
            error!("Attribute table full, dropping {:?}", entry.id);
            HidError::LayoutFull
        })
    }

    pub fn get(&self, id: AttributeId) -> Option<&AttributeDescriptor> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: AttributeId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// ATT error codes the HID service returns to the GATT server
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttError {
    ReadNotPermitted = 0x02,
    WriteNotPermitted = 0x03,
    AttributeNotFound = 0x0a,
    InvalidAttributeValueLength = 0x0d,
    ValueNotAllowed = 0x13,
}

impl AttError {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for AttError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttError::ReadNotPermitted => write!(f, "read not permitted"),
            AttError::WriteNotPermitted => write!(f, "write not permitted"),
            AttError::AttributeNotFound => write!(f, "attribute not found"),
            AttError::InvalidAttributeValueLength => write!(f, "invalid attribute value length"),
            AttError::ValueNotAllowed => write!(f, "value not allowed"),
        }
    }
}
