//! Settings draft validation
//!
//! Checks run in a fixed order and every failing check is reported, so the
//! operator sees all invalid fields at once.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{AddressingMode, DhcpServerRange, SettingsDraft, TimeSource};

/// Identifier of an invalid input, used as key into the message catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldTag {
    DeviceHostname,
    DeviceIp,
    SubnetMask,
    GatewayIp,
    DnsFirst,
    DnsSecond,
    DhcpRangeStart,
    DhcpRangeEnd,
    DhcpRangeDef,
    ManualDate,
    ManualTime,
    NtpServerHostname,
}

impl FieldTag {
    /// Every tag in evaluation order
    pub const ALL: [FieldTag; 12] = [
        Self::DeviceHostname,
        Self::DeviceIp,
        Self::SubnetMask,
        Self::GatewayIp,
        Self::DnsFirst,
        Self::DnsSecond,
        Self::DhcpRangeStart,
        Self::DhcpRangeEnd,
        Self::DhcpRangeDef,
        Self::ManualDate,
        Self::ManualTime,
        Self::NtpServerHostname,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceHostname => "DEVICE_HOSTNAME",
            Self::DeviceIp => "DEVICE_IP",
            Self::SubnetMask => "SUBNET_MASK",
            Self::GatewayIp => "GATEWAY_IP",
            Self::DnsFirst => "DNS_FIRST",
            Self::DnsSecond => "DNS_SECOND",
            Self::DhcpRangeStart => "DHCP_RANGE_START",
            Self::DhcpRangeEnd => "DHCP_RANGE_END",
            Self::DhcpRangeDef => "DHCP_RANGE_DEF",
            Self::ManualDate => "MANUAL_DATE",
            Self::ManualTime => "MANUAL_TIME",
            Self::NtpServerHostname => "NTP_SERVER_HOSTNAME",
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a settings draft
///
/// Returns the failing fields in evaluation order; an empty list means the
/// draft can be persisted.
pub fn validate(draft: &SettingsDraft) -> Vec<FieldTag> {
    let mut failures = Vec::new();

    // syntax (RFC 1123) is enforced by the input form
    if draft.hostname.is_empty() {
        failures.push(FieldTag::DeviceHostname);
    }

    if let AddressingMode::Static(addressing) = &draft.addressing {
        let fields = [
            (&addressing.device_ip, FieldTag::DeviceIp),
            (&addressing.subnet_mask, FieldTag::SubnetMask),
            (&addressing.gateway_ip, FieldTag::GatewayIp),
            (&addressing.dns_primary, FieldTag::DnsFirst),
            (&addressing.dns_secondary, FieldTag::DnsSecond),
        ];
        failures.extend(
            fields
                .into_iter()
                .filter(|(field, _)| !field.valid)
                .map(|(_, tag)| tag),
        );

        if let Some(range) = &addressing.dhcp_server {
            validate_dhcp_range(range, &mut failures);
        }
    }

    match &draft.time_source {
        TimeSource::Manual(manual) => {
            if is_blank(&manual.date) {
                failures.push(FieldTag::ManualDate);
            }
            if is_blank(&manual.time) {
                failures.push(FieldTag::ManualTime);
            }
        }
        TimeSource::Ntp(ntp) => {
            if !ntp.hostname_valid {
                failures.push(FieldTag::NtpServerHostname);
            }
        }
    }

    failures
}

fn validate_dhcp_range(range: &DhcpServerRange, failures: &mut Vec<FieldTag>) {
    // network address
    if !range.start.valid || range.start.last_octet() == Some(0) {
        failures.push(FieldTag::DhcpRangeStart);
    }

    // broadcast address
    if !range.end.valid || range.end.last_octet() == Some(255) {
        failures.push(FieldTag::DhcpRangeEnd);
    }

    // independent of the endpoint checks above
    if range.start.valid && range.end.valid {
        if let (Some(start), Some(end)) = (range.start.ordinal(), range.end.ordinal()) {
            if start > end {
                failures.push(FieldTag::DhcpRangeDef);
            }
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IpAddressField, ManualTime, NtpSource, StaticAddressing};

    fn ntp(hostname_valid: bool) -> TimeSource {
        TimeSource::Ntp(NtpSource {
            server_address: "pool.ntp.org".to_string(),
            hostname_valid,
            override_address: None,
        })
    }

    fn manual_time(date: Option<&str>, time: Option<&str>) -> TimeSource {
        TimeSource::Manual(ManualTime {
            date: date.map(str::to_string),
            time: time.map(str::to_string),
        })
    }

    fn invalid(value: &str) -> IpAddressField {
        IpAddressField {
            value: value.to_string(),
            valid: false,
        }
    }

    fn static_addressing() -> StaticAddressing {
        StaticAddressing {
            device_ip: IpAddressField::parse("192.168.1.100"),
            subnet_mask: IpAddressField::parse("255.255.255.0"),
            gateway_ip: IpAddressField::parse("192.168.1.1"),
            dns_primary: IpAddressField::parse("8.8.8.8"),
            dns_secondary: IpAddressField::parse("8.8.4.4"),
            dhcp_server: None,
        }
    }

    fn with_range(start: IpAddressField, end: IpAddressField) -> SettingsDraft {
        SettingsDraft::new(
            "rameplayer",
            AddressingMode::Static(StaticAddressing {
                dhcp_server: Some(DhcpServerRange { start, end }),
                ..static_addressing()
            }),
            ntp(true),
        )
    }

    mod hostname {
        use super::*;

        #[test]
        fn empty_hostname_is_reported() {
            let draft = SettingsDraft::new("", AddressingMode::DhcpClient, ntp(true));
            assert_eq!(validate(&draft), vec![FieldTag::DeviceHostname]);
        }

        #[test]
        fn valid_dhcp_client_draft_passes() {
            let draft = SettingsDraft::new("rameplayer", AddressingMode::DhcpClient, ntp(true));
            assert!(validate(&draft).is_empty());
        }
    }

    mod addressing {
        use super::*;

        #[test]
        fn empty_hostname_and_invalid_device_ip_are_both_reported() {
            let draft = SettingsDraft::new(
                "",
                AddressingMode::Static(StaticAddressing {
                    device_ip: invalid("192.168.1"),
                    ..static_addressing()
                }),
                ntp(true),
            );

            assert_eq!(
                validate(&draft),
                vec![FieldTag::DeviceHostname, FieldTag::DeviceIp]
            );
        }

        #[test]
        fn every_invalid_address_field_is_reported_in_order() {
            let draft = SettingsDraft::new(
                "rameplayer",
                AddressingMode::Static(StaticAddressing {
                    device_ip: invalid(""),
                    subnet_mask: invalid(""),
                    gateway_ip: invalid(""),
                    dns_primary: invalid(""),
                    dns_secondary: invalid(""),
                    dhcp_server: Some(DhcpServerRange {
                        start: invalid(""),
                        end: invalid(""),
                    }),
                }),
                ntp(true),
            );

            assert_eq!(
                validate(&draft),
                vec![
                    FieldTag::DeviceIp,
                    FieldTag::SubnetMask,
                    FieldTag::GatewayIp,
                    FieldTag::DnsFirst,
                    FieldTag::DnsSecond,
                    FieldTag::DhcpRangeStart,
                    FieldTag::DhcpRangeEnd,
                ]
            );
        }

        #[test]
        fn dhcp_client_mode_ignores_parked_invalid_fields() {
            let mut draft = SettingsDraft::new(
                "rameplayer",
                AddressingMode::Static(StaticAddressing {
                    device_ip: invalid("x"),
                    gateway_ip: invalid("y"),
                    dhcp_server: Some(DhcpServerRange {
                        start: invalid(""),
                        end: IpAddressField::parse("192.168.1.255"),
                    }),
                    ..static_addressing()
                }),
                ntp(true),
            );
            draft.use_dhcp_client();

            assert!(validate(&draft).is_empty());
        }

        #[test]
        fn disabled_dhcp_server_skips_range_checks() {
            let draft = SettingsDraft::new(
                "rameplayer",
                AddressingMode::Static(static_addressing()),
                ntp(true),
            );

            assert!(validate(&draft).is_empty());
        }
    }

    mod dhcp_range {
        use super::*;

        #[test]
        fn descending_range_is_reported() {
            let draft = with_range(
                IpAddressField::parse("192.168.1.50"),
                IpAddressField::parse("192.168.1.10"),
            );

            assert_eq!(validate(&draft), vec![FieldTag::DhcpRangeDef]);
        }

        #[test]
        fn ascending_and_single_address_ranges_pass() {
            let pairs = [
                ("192.168.1.10", "192.168.1.50"),
                ("192.168.1.10", "192.168.1.10"),
                ("192.168.1.99", "192.168.1.100"),
                ("10.0.0.1", "192.168.1.1"),
                ("127.255.255.254", "128.0.0.1"),
            ];

            for (start, end) in pairs {
                let draft =
                    with_range(IpAddressField::parse(start), IpAddressField::parse(end));
                assert!(validate(&draft).is_empty(), "{start} -> {end}");
            }
        }

        #[test]
        fn descending_ranges_are_always_reported() {
            let pairs = [
                ("192.168.1.100", "192.168.1.99"),
                ("192.168.2.1", "192.168.1.254"),
                ("128.0.0.1", "127.255.255.254"),
            ];

            for (start, end) in pairs {
                let draft =
                    with_range(IpAddressField::parse(start), IpAddressField::parse(end));
                assert_eq!(
                    validate(&draft),
                    vec![FieldTag::DhcpRangeDef],
                    "{start} -> {end}"
                );
            }
        }

        #[test]
        fn network_address_as_start_is_reported() {
            let draft = with_range(
                IpAddressField::parse("192.168.1.0"),
                IpAddressField::parse("192.168.1.100"),
            );

            assert_eq!(validate(&draft), vec![FieldTag::DhcpRangeStart]);
        }

        #[test]
        fn broadcast_address_as_end_is_reported() {
            let draft = with_range(
                IpAddressField::parse("192.168.1.10"),
                IpAddressField::parse("192.168.1.255"),
            );

            assert_eq!(validate(&draft), vec![FieldTag::DhcpRangeEnd]);
        }

        #[test]
        fn endpoint_and_ordering_failures_accumulate() {
            let draft = with_range(
                IpAddressField::parse("192.168.2.0"),
                IpAddressField::parse("192.168.1.255"),
            );

            assert_eq!(
                validate(&draft),
                vec![
                    FieldTag::DhcpRangeStart,
                    FieldTag::DhcpRangeEnd,
                    FieldTag::DhcpRangeDef
                ]
            );
        }

        #[test]
        fn ordering_is_skipped_when_an_endpoint_is_invalid() {
            let draft = with_range(
                IpAddressField::parse("192.168.1.200"),
                invalid("192.168.1."),
            );

            assert_eq!(validate(&draft), vec![FieldTag::DhcpRangeEnd]);
        }
    }

    mod time_source {
        use super::*;

        #[test]
        fn missing_manual_time_is_reported() {
            let draft = SettingsDraft::new(
                "rameplayer",
                AddressingMode::DhcpClient,
                manual_time(Some("2024-01-01"), Some("")),
            );

            assert_eq!(validate(&draft), vec![FieldTag::ManualTime]);
        }

        #[test]
        fn missing_manual_date_and_time_are_reported() {
            let draft = SettingsDraft::new(
                "rameplayer",
                AddressingMode::DhcpClient,
                manual_time(None, None),
            );

            assert_eq!(
                validate(&draft),
                vec![FieldTag::ManualDate, FieldTag::ManualTime]
            );
        }

        #[test]
        fn manual_time_ignores_ntp_hostname_validity() {
            let mut draft =
                SettingsDraft::new("rameplayer", AddressingMode::DhcpClient, ntp(false));
            draft.use_manual_time_source();
            if let TimeSource::Manual(manual) = &mut draft.time_source {
                manual.date = Some("2024-01-01".to_string());
                manual.time = Some("12:00".to_string());
            }

            assert!(validate(&draft).is_empty());
        }

        #[test]
        fn invalid_ntp_hostname_is_reported() {
            let draft =
                SettingsDraft::new("rameplayer", AddressingMode::DhcpClient, ntp(false));

            assert_eq!(validate(&draft), vec![FieldTag::NtpServerHostname]);
        }
    }

    #[test]
    fn field_tags_serialize_to_catalog_keys() {
        let json = serde_json::to_string(&[FieldTag::DnsFirst, FieldTag::NtpServerHostname])
            .unwrap();
        assert_eq!(json, r#"["DNS_FIRST","NTP_SERVER_HOSTNAME"]"#);
        assert_eq!(FieldTag::DhcpRangeDef.to_string(), "DHCP_RANGE_DEF");
    }

    #[test]
    fn as_str_matches_serialized_tag_for_every_variant() {
        for tag in FieldTag::ALL {
            let serialized = serde_json::to_value(tag).unwrap();
            assert_eq!(serialized, tag.as_str(), "{tag:?}");

            let parsed: FieldTag = serde_json::from_value(serialized).unwrap();
            assert_eq!(parsed, tag);
        }
    }
}
