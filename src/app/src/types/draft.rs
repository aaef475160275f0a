use serde::{Deserialize, Serialize};

use super::ip::{network_prefix, IpAddressField};
use super::settings::{AudioPort, SystemSettings, VideoOutput};

/// DHCP server address pool offered to clients
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DhcpServerRange {
    pub start: IpAddressField,
    pub end: IpAddressField,
}

/// Manually configured addressing
///
/// `dhcp_server` is `Some` while the device acts as DHCP server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaticAddressing {
    pub device_ip: IpAddressField,
    pub subnet_mask: IpAddressField,
    pub gateway_ip: IpAddressField,
    pub dns_primary: IpAddressField,
    pub dns_secondary: IpAddressField,
    #[serde(default)]
    pub dhcp_server: Option<DhcpServerRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum AddressingMode {
    #[default]
    DhcpClient,
    Static(StaticAddressing),
}

/// Date and time entered by the operator, both as typed into the form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManualTime {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Network time synchronization
///
/// `override_address` is `Some` while the operator overrides the configured server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NtpSource {
    pub server_address: String,
    pub hostname_valid: bool,
    #[serde(default)]
    pub override_address: Option<String>,
}

impl Default for NtpSource {
    fn default() -> Self {
        Self {
            server_address: String::new(),
            hostname_valid: true,
            override_address: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum TimeSource {
    Manual(ManualTime),
    Ntp(NtpSource),
}

impl Default for TimeSource {
    fn default() -> Self {
        Self::Ntp(NtpSource::default())
    }
}

/// Editable mirror of the device settings shown in the admin view
///
/// Created from the fetched [`SystemSettings`], mutated by operator input and
/// handed to the save orchestrator by value when the operator saves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDraft {
    pub hostname: String,
    pub addressing: AddressingMode,
    pub time_source: TimeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_port: Option<AudioPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_output: Option<VideoOutput>,

    // inactive alternatives kept so that toggling a mode back restores the edits
    #[serde(skip)]
    parked_static: Option<StaticAddressing>,
    #[serde(skip)]
    parked_ntp: Option<NtpSource>,
}

impl From<&SystemSettings> for SettingsDraft {
    fn from(settings: &SystemSettings) -> Self {
        let addressing = if settings.ip_dhcp_client {
            AddressingMode::DhcpClient
        } else {
            AddressingMode::Static(StaticAddressing::from(settings))
        };

        Self {
            hostname: settings.hostname.clone(),
            addressing,
            time_source: TimeSource::Ntp(NtpSource {
                server_address: settings.ntp_server_address.clone(),
                hostname_valid: true,
                override_address: None,
            }),
            audio_port: settings.audio_port,
            video_output: settings.video_output,
            parked_static: settings
                .ip_dhcp_client
                .then(|| StaticAddressing::from(settings)),
            parked_ntp: None,
        }
    }
}

impl From<&SystemSettings> for StaticAddressing {
    fn from(settings: &SystemSettings) -> Self {
        Self {
            device_ip: IpAddressField::trusted(settings.ip_address.clone()),
            subnet_mask: IpAddressField::trusted(settings.ip_subnet_mask.clone()),
            gateway_ip: IpAddressField::trusted(settings.ip_gateway.clone()),
            dns_primary: IpAddressField::trusted(settings.ip_dns_primary.clone()),
            dns_secondary: IpAddressField::trusted(settings.ip_dns_secondary.clone()),
            dhcp_server: settings.ip_dhcp_server.then(|| DhcpServerRange {
                start: IpAddressField::trusted(settings.ip_dhcp_range_start.clone()),
                end: IpAddressField::trusted(settings.ip_dhcp_range_end.clone()),
            }),
        }
    }
}

impl SettingsDraft {
    pub fn new(
        hostname: impl Into<String>,
        addressing: AddressingMode,
        time_source: TimeSource,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            addressing,
            time_source,
            audio_port: None,
            video_output: None,
            parked_static: None,
            parked_ntp: None,
        }
    }

    pub fn manual_ip_config(&self) -> bool {
        matches!(self.addressing, AddressingMode::Static(_))
    }

    pub fn dhcp_server_enabled(&self) -> bool {
        matches!(
            &self.addressing,
            AddressingMode::Static(StaticAddressing {
                dhcp_server: Some(_),
                ..
            })
        )
    }

    pub fn use_manual_time(&self) -> bool {
        matches!(self.time_source, TimeSource::Manual(_))
    }

    pub fn use_ntp_override(&self) -> bool {
        matches!(
            &self.time_source,
            TimeSource::Ntp(NtpSource {
                override_address: Some(_),
                ..
            })
        )
    }

    /// Static addressing block, if active
    pub fn static_addressing_mut(&mut self) -> Option<&mut StaticAddressing> {
        match &mut self.addressing {
            AddressingMode::Static(addressing) => Some(addressing),
            AddressingMode::DhcpClient => None,
        }
    }

    /// Switch to DHCP client addressing, parking the static configuration
    pub fn use_dhcp_client(&mut self) {
        if let AddressingMode::Static(addressing) =
            std::mem::replace(&mut self.addressing, AddressingMode::DhcpClient)
        {
            self.parked_static = Some(addressing);
        }
    }

    /// Switch to static addressing, restoring previously parked values
    pub fn use_static_addressing(&mut self) {
        if !self.manual_ip_config() {
            let addressing = self.parked_static.take().unwrap_or_default();
            self.addressing = AddressingMode::Static(addressing);
        }
    }

    /// Enable DHCP server mode; only possible with static addressing
    pub fn enable_dhcp_server(&mut self) -> bool {
        match self.static_addressing_mut() {
            Some(addressing) => {
                addressing.dhcp_server.get_or_insert_with(DhcpServerRange::default);
                true
            }
            None => false,
        }
    }

    pub fn disable_dhcp_server(&mut self) {
        if let Some(addressing) = self.static_addressing_mut() {
            addressing.dhcp_server = None;
        }
    }

    /// Prefill both DHCP range endpoints with the device IP's network part
    ///
    /// The prefilled values are incomplete addresses and therefore not valid yet.
    pub fn prefill_dhcp_range(&mut self) -> bool {
        let Some(addressing) = self.static_addressing_mut() else {
            return false;
        };
        let prefix = network_prefix(&addressing.device_ip.value);
        let range = addressing
            .dhcp_server
            .get_or_insert_with(DhcpServerRange::default);
        range.start = IpAddressField::parse(prefix.clone());
        range.end = IpAddressField::parse(prefix);
        true
    }

    /// Flip between manual date/time and NTP synchronization
    pub fn toggle_manual_time(&mut self) {
        if self.use_manual_time() {
            self.use_ntp();
        } else {
            self.use_manual_time_source();
        }
    }

    /// Switch to manual date/time; turns any NTP override off
    pub fn use_manual_time_source(&mut self) {
        if self.use_manual_time() {
            return;
        }

        if let TimeSource::Ntp(mut ntp) = std::mem::replace(
            &mut self.time_source,
            TimeSource::Manual(ManualTime::default()),
        ) {
            ntp.override_address = None;
            self.parked_ntp = Some(ntp);
        }
    }

    /// Switch to NTP synchronization, restoring the parked server settings
    pub fn use_ntp(&mut self) {
        if self.use_manual_time() {
            self.time_source = TimeSource::Ntp(self.parked_ntp.take().unwrap_or_default());
        }
    }

    /// Set or clear the NTP override address; ignored while manual time is active
    pub fn set_ntp_override(&mut self, address: Option<String>) -> bool {
        match &mut self.time_source {
            TimeSource::Ntp(ntp) => {
                ntp.override_address = address;
                true
            }
            TimeSource::Manual(_) => false,
        }
    }
}
