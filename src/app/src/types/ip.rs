use serde::{Deserialize, Serialize};

/// Validate IPv4 address format
///
/// Unlike form-level checks for optional inputs, an empty string is rejected:
/// every address field of the settings draft is mandatory once it is relevant.
pub fn is_valid_ipv4(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts.iter().all(|part| {
        !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) && part.parse::<u8>().is_ok()
    })
}

/// Numeric value of a dotted-quad address, `None` unless it has four octets
pub fn to_ordinal(addr: &str) -> Option<u32> {
    let mut octets = addr.split('.').map(|part| part.trim().parse::<u8>().ok());

    let (Some(Some(o0)), Some(Some(o1)), Some(Some(o2)), Some(Some(o3)), None) = (
        octets.next(),
        octets.next(),
        octets.next(),
        octets.next(),
        octets.next(),
    ) else {
        return None;
    };

    Some(
        u32::from(o0) * 16_777_216
            + u32::from(o1) * 65_536
            + u32::from(o2) * 256
            + u32::from(o3),
    )
}

/// `a <= b` by numeric address value; `false` if either does not parse
pub fn less_or_equal(a: &str, b: &str) -> bool {
    match (to_ordinal(a), to_ordinal(b)) {
        (Some(a), Some(b)) => a <= b,
        _ => false,
    }
}

/// Fourth dot-separated segment parsed as an integer
pub fn last_octet(addr: &str) -> Option<u8> {
    addr.split('.').nth(3)?.trim().parse::<u8>().ok()
}

/// First three octets of an address followed by a trailing dot, e.g. `192.168.1.`
///
/// Missing octets are left empty, so an empty address yields `...`.
pub fn network_prefix(addr: &str) -> String {
    let mut octets = addr.split('.');
    let mut prefix = String::new();
    for _ in 0..3 {
        prefix.push_str(octets.next().unwrap_or_default());
        prefix.push('.');
    }
    prefix
}

/// Address input as edited in the console together with its format validity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpAddressField {
    pub value: String,
    pub valid: bool,
}

impl IpAddressField {
    /// Field with validity derived from the IPv4 format check
    pub fn parse(value: impl Into<String>) -> Self {
        let value = value.into();
        let valid = is_valid_ipv4(&value);
        Self { value, valid }
    }

    /// Field taken over from persisted device settings, which count as valid
    pub fn trusted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            valid: true,
        }
    }

    pub fn ordinal(&self) -> Option<u32> {
        to_ordinal(&self.value)
    }

    pub fn last_octet(&self) -> Option<u8> {
        last_octet(&self.value)
    }
}
