/// HID service uuid defined in BLE protocol
pub const BLE_HID_SERVICE_UUID: u16 = 0x1812;

/// Characteristics uuids used by the HID service
///
/// reference: https://bitbucket.org/bluetooth-SIG/public/src/main/assigned_numbers/uuids/characteristic_uuids.yaml
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleCharacteristics {
    HidInfo = 0x2a4a,
    ReportMap = 0x2a4b,
    HidControlPoint = 0x2a4c,
    HidReport = 0x2a4d,
    ProtocolMode = 0x2a4e,
}

/// Descriptor uuids used by the HID service
///
/// reference: https://bitbucket.org/bluetooth-SIG/public/src/main/assigned_numbers/uuids/descriptors.yaml
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleDescriptor {
    ReportReference = 0x2908,
}

impl BleCharacteristics {
    pub fn uuid(self) -> u16 {
        self as u16
    }
}

impl BleDescriptor {
    pub fn uuid(self) -> u16 {
        self as u16
    }
}
