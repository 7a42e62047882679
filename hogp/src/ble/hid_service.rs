use core::slice;

use super::constants::BleCharacteristics;
use super::gatt::{AttError, AttributeDescriptor, AttributeId, Properties, ServiceLayout};
use super::report::ReportChannel;
use crate::config::HidServiceConfig;
use crate::hid::{
    ControlPointCommand, HidError, HidInformation, MAX_REPORT_MAP_LEN, Notifier, ProtocolMode, ReportReference,
    ReportType,
};

/// What a host write changed in the HID service
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidServiceEvent {
    /// New output report, fetch it with `HidService::read`
    OutputReport,
    /// New feature report, fetch it with `HidService::feature`
    FeatureReport,
    ProtocolMode(ProtocolMode),
    ControlPoint(u8),
}

/// The HID service.
///
/// Owns every attribute value of the service. The BLE stack registers the attributes listed by
/// [`HidService::layout`], then forwards host reads to [`HidService::on_read`] and host writes to
/// [`HidService::on_write`]. The application pushes input reports with [`HidService::send`] and
/// pulls output reports with [`HidService::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidService<'a> {
    report_map: &'a [u8],
    hid_info: HidInformation,
    hid_info_raw: [u8; 4],
    input: Option<ReportChannel>,
    output: Option<ReportChannel>,
    feature: Option<ReportChannel>,
    protocol_mode: Option<ProtocolMode>,
    control_point: u8,
    layout: ServiceLayout,
}

impl<'a> HidService<'a> {
    pub fn new(config: HidServiceConfig<'a>) -> Result<Self, HidError> {
        if config.report_map.is_empty() {
            error!("Report map is empty");
            return Err(HidError::EmptyReportMap);
        }
        if config.report_map.len() > MAX_REPORT_MAP_LEN {
            error!("Report map length {} exceeds {}", config.report_map.len(), MAX_REPORT_MAP_LEN);
            return Err(HidError::ReportMapTooLong);
        }

        let input = ReportChannel::new(ReportType::Input, &config.input)?;
        let output = ReportChannel::new(ReportType::Output, &config.output)?;
        let feature = ReportChannel::new(ReportType::Feature, &config.feature)?;
        let protocol_mode = config.boot_protocol.then_some(ProtocolMode::Report);

        let mut layout = ServiceLayout::new();
        layout.push(AttributeDescriptor::characteristic(
            BleCharacteristics::HidInfo,
            AttributeId::HidInformation,
            Properties::new().with_read(true),
            4,
        ))?;
        layout.push(AttributeDescriptor::characteristic(
            BleCharacteristics::ReportMap,
            AttributeId::ReportMap,
            Properties::new().with_read(true),
            config.report_map.len(),
        ))?;
        layout.push(AttributeDescriptor::characteristic(
            BleCharacteristics::HidControlPoint,
            AttributeId::ControlPoint,
            Properties::new().with_write_without_response(true),
            1,
        ))?;
        if protocol_mode.is_some() {
            layout.push(AttributeDescriptor::characteristic(
                BleCharacteristics::ProtocolMode,
                AttributeId::ProtocolMode,
                Properties::new().with_read(true).with_write_without_response(true),
                1,
            ))?;
        }
        for channel in [&input, &output, &feature].into_iter().flatten() {
            let report_type = channel.reference().report_type;
            layout.push(AttributeDescriptor::characteristic(
                BleCharacteristics::HidReport,
                AttributeId::Report(report_type),
                channel.properties(),
                channel.len(),
            ))?;
            layout.push(AttributeDescriptor::report_reference(report_type))?;
        }

        info!("HID service created with {} attributes", layout.len());

        Ok(Self {
            report_map: config.report_map,
            hid_info: config.hid_info,
            hid_info_raw: config.hid_info.to_bytes(),
            input,
            output,
            feature,
            protocol_mode,
            control_point: 0,
            layout,
        })
    }

    /// Attributes to register in the GATT server, in declaration order
    pub fn layout(&self) -> &ServiceLayout {
        &self.layout
    }

    /// Attributes along with their current values
    pub fn attributes(&self) -> impl Iterator<Item = (&AttributeDescriptor, &[u8])> + '_ {
        self.layout
            .iter()
            .filter_map(|attr| self.value(attr.id).map(|value| (attr, value)))
    }

    /// Current value of an attribute, `None` if the attribute is not part of the service
    pub fn value(&self, id: AttributeId) -> Option<&[u8]> {
        match id {
            AttributeId::ReportMap => Some(self.report_map),
            AttributeId::HidInformation => Some(&self.hid_info_raw),
            AttributeId::ControlPoint => Some(slice::from_ref(&self.control_point)),
            AttributeId::ProtocolMode => self.protocol_mode.map(ProtocolMode::as_bytes),
            AttributeId::Report(ty) => self.channel(ty).map(ReportChannel::as_slice),
            AttributeId::ReportReference(ty) => self.channel(ty).map(ReportChannel::reference_bytes),
        }
    }

    /// Handle a read request from the host
    pub fn on_read(&self, id: AttributeId) -> Result<&[u8], AttError> {
        let attr = self.layout.get(id).ok_or(AttError::AttributeNotFound)?;
        if !attr.properties.readable() {
            debug!("Read of {:?} not permitted", id);
            return Err(AttError::ReadNotPermitted);
        }
        self.value(id).ok_or(AttError::AttributeNotFound)
    }

    /// Handle a write request from the host.
    ///
    /// The value is validated first, a rejected write leaves the service unchanged.
    pub fn on_write(&mut self, id: AttributeId, data: &[u8]) -> Result<HidServiceEvent, AttError> {
        let attr = self.layout.get(id).ok_or(AttError::AttributeNotFound)?;
        if !attr.properties.writable() {
            debug!("Write to {:?} not permitted", id);
            return Err(AttError::WriteNotPermitted);
        }

        match id {
            AttributeId::Report(ty @ (ReportType::Output | ReportType::Feature)) => {
                let channel = self.channel_mut(ty).ok_or(AttError::AttributeNotFound)?;
                channel.store(data).map_err(|e| {
                    warn!("Rejected {:?} report write: {:?}", ty, e);
                    AttError::InvalidAttributeValueLength
                })?;
                debug!("Got {:?} report: {:?}", ty, data);
                Ok(match ty {
                    ReportType::Output => HidServiceEvent::OutputReport,
                    _ => HidServiceEvent::FeatureReport,
                })
            }
            AttributeId::ProtocolMode => {
                let &[byte] = data else {
                    return Err(AttError::InvalidAttributeValueLength);
                };
                let mode = ProtocolMode::try_from(byte).map_err(|b| {
                    warn!("Invalid protocol mode {}", b);
                    AttError::ValueNotAllowed
                })?;
                let current = self.protocol_mode.as_mut().ok_or(AttError::AttributeNotFound)?;
                info!("Protocol mode: {:?} -> {:?}", *current, mode);
                *current = mode;
                Ok(HidServiceEvent::ProtocolMode(mode))
            }
            AttributeId::ControlPoint => {
                let &[byte] = data else {
                    return Err(AttError::InvalidAttributeValueLength);
                };
                info!("HID control point: {}", byte);
                self.control_point = byte;
                Ok(HidServiceEvent::ControlPoint(byte))
            }
            _ => Err(AttError::WriteNotPermitted),
        }
    }

    /// Send an input report to the host.
    ///
    /// The stored input value is updated before notifying, so a failed notification still leaves
    /// the new value readable by the host. Reports must be paced by the caller, see
    /// [`crate::reporter::InputReporter`].
    pub fn send<N: Notifier + ?Sized>(&mut self, notifier: &mut N, report: &[u8]) -> Result<(), HidError> {
        let channel = self.input.as_mut().ok_or(HidError::ChannelAbsent(ReportType::Input))?;
        channel.store(report)?;
        notifier
            .notify(AttributeId::Report(ReportType::Input), channel.as_slice())
            .map_err(|e| {
                warn!("Failed to notify input report: {:?}", e);
                HidError::Notify(e)
            })
    }

    /// Copy the latest output report written by the host into `dest`
    pub fn read(&self, dest: &mut [u8]) -> Result<usize, HidError> {
        self.output
            .as_ref()
            .ok_or(HidError::ChannelAbsent(ReportType::Output))?
            .load(dest)
    }

    /// Latest feature report
    pub fn feature(&self) -> Result<&[u8], HidError> {
        self.feature
            .as_ref()
            .map(ReportChannel::as_slice)
            .ok_or(HidError::ChannelAbsent(ReportType::Feature))
    }

    /// Update the feature report the host will read
    pub fn set_feature(&mut self, report: &[u8]) -> Result<(), HidError> {
        self.feature
            .as_mut()
            .ok_or(HidError::ChannelAbsent(ReportType::Feature))?
            .store(report)
    }

    /// Current protocol mode, `None` if boot protocol isn't supported
    pub fn protocol_mode(&self) -> Option<ProtocolMode> {
        self.protocol_mode
    }

    /// Last byte written to the control point
    pub fn control_point(&self) -> u8 {
        self.control_point
    }

    /// Last control point write as a command, `None` if the byte is not a known command
    pub fn control_point_command(&self) -> Option<ControlPointCommand> {
        ControlPointCommand::from_repr(self.control_point)
    }

    pub fn hid_info(&self) -> &HidInformation {
        &self.hid_info
    }

    pub fn report_map(&self) -> &'a [u8] {
        self.report_map
    }

    pub fn report_reference(&self, report_type: ReportType) -> Option<ReportReference> {
        self.channel(report_type).map(ReportChannel::reference)
    }

    fn channel(&self, report_type: ReportType) -> Option<&ReportChannel> {
        match report_type {
            ReportType::Input => self.input.as_ref(),
            ReportType::Output => self.output.as_ref(),
            ReportType::Feature => self.feature.as_ref(),
        }
    }

    fn channel_mut(&mut self, report_type: ReportType) -> Option<&mut ReportChannel> {
        match report_type {
            ReportType::Input => self.input.as_mut(),
            ReportType::Output => self.output.as_mut(),
            ReportType::Feature => self.feature.as_mut(),
        }
    }
}
