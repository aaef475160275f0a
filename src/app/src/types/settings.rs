use serde::{Deserialize, Serialize};
use serde_valid::Validate;

use super::draft::{AddressingMode, SettingsDraft, TimeSource};

/// Audio output routing of the player
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AudioPort {
    #[serde(rename = "rameAnalogOnly")]
    AnalogOnly,
    #[serde(rename = "rameHdmiOnly")]
    HdmiOnly,
    #[serde(rename = "rameHdmiAndAnalog")]
    HdmiAndAnalog,
}

/// Video output resolution of the player
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VideoOutput {
    #[serde(rename = "rameAutodetect")]
    Autodetect,
    #[serde(rename = "rame720p50")]
    Hd720p50,
    #[serde(rename = "rame720p60")]
    Hd720p60,
    #[serde(rename = "rame1080i50")]
    Hd1080i50,
    #[serde(rename = "rame1080i60")]
    Hd1080i60,
    #[serde(rename = "rame1080p50")]
    Hd1080p50,
    #[serde(rename = "rame1080p60")]
    Hd1080p60,
}

/// System settings as served by the device REST API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub hostname: String,
    pub ip_dhcp_client: bool,
    pub ip_address: String,
    pub ip_subnet_mask: String,
    pub ip_gateway: String,
    pub ip_dns_primary: String,
    pub ip_dns_secondary: String,
    pub ip_dhcp_server: bool,
    pub ip_dhcp_range_start: String,
    pub ip_dhcp_range_end: String,
    pub ntp_server_address: String,
    #[serde(rename = "dateAndTimeInUTC")]
    pub date_and_time_in_utc: Option<String>,
    pub audio_port: Option<AudioPort>,
    pub video_output: Option<VideoOutput>,
}

/// Record written to the device settings store after a successful validation
///
/// Fields that do not apply to the chosen addressing or time source are left
/// out of the serialized record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    #[validate(min_length = 1)]
    #[validate(max_length = 253)]
    pub hostname: String,
    pub ip_dhcp_client: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_subnet_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dns_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dns_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dhcp_server: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dhcp_range_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dhcp_range_end: Option<String>,
    #[serde(
        rename = "dateAndTimeInUTC",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_and_time_in_utc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp_server_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_port: Option<AudioPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_output: Option<VideoOutput>,
}

impl PersistedSettings {
    /// Translate a validated draft into the persisted record
    ///
    /// Must only be called for drafts without validation failures.
    pub fn from_draft(draft: &SettingsDraft) -> Self {
        let mut record = Self {
            hostname: draft.hostname.clone(),
            ip_dhcp_client: !draft.manual_ip_config(),
            audio_port: draft.audio_port,
            video_output: draft.video_output,
            ..Default::default()
        };

        if let AddressingMode::Static(addressing) = &draft.addressing {
            record.ip_address = Some(addressing.device_ip.value.clone());
            record.ip_subnet_mask = Some(addressing.subnet_mask.value.clone());
            record.ip_gateway = Some(addressing.gateway_ip.value.clone());
            record.ip_dns_primary = Some(addressing.dns_primary.value.clone());
            record.ip_dns_secondary = Some(addressing.dns_secondary.value.clone());
            record.ip_dhcp_server = Some(addressing.dhcp_server.is_some());

            if let Some(range) = &addressing.dhcp_server {
                record.ip_dhcp_range_start = Some(range.start.value.clone());
                record.ip_dhcp_range_end = Some(range.end.value.clone());
            }
        }

        match &draft.time_source {
            TimeSource::Manual(manual) => {
                let date = manual.date.as_deref().unwrap_or_default();
                let time = manual.time.as_deref().unwrap_or_default();
                record.date_and_time_in_utc = Some(format!("{date} {time}"));
            }
            TimeSource::Ntp(ntp) => {
                let address = ntp
                    .override_address
                    .as_ref()
                    .unwrap_or(&ntp.server_address);
                record.ntp_server_address = Some(address.clone());
            }
        }

        record
    }
}
