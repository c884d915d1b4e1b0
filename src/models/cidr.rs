//! IPv4 CIDR notation used for virtual network and subnet address space.
//!
//! Provides [`Cidr`] plus the mask arithmetic needed to check that a subnet
//! prefix stays inside its parent network.

use crate::error::{ProvisionError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use az_provision::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        Err(ProvisionError::InvalidCidr(format!(
            "network length /{len} is too long"
        )))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// IPv4 address space in CIDR notation, e.g. `10.0.0.0/16`.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl Cidr {
    /// Parse a CIDR string such as `"10.0.0.0/24"`.
    pub fn new(addr_cidr: &str) -> Result<Cidr> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| ProvisionError::InvalidCidr(format!("{addr_cidr}: expected addr/mask")))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| ProvisionError::InvalidCidr(format!("{addr_cidr}: invalid address")))?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| ProvisionError::InvalidCidr(format!("{addr_cidr}: invalid mask")))?;
        if mask > MAX_LENGTH {
            return Err(ProvisionError::InvalidCidr(format!(
                "{addr_cidr}: network length is too long"
            )));
        }
        Ok(Cidr { addr, mask })
    }

    /// Lowest (network) address in the range.
    pub fn lo(&self) -> Ipv4Addr {
        let mask = get_cidr_mask(self.mask).unwrap_or(u32::MAX);
        Ipv4Addr::from(u32::from(self.addr) & mask)
    }

    /// Highest (broadcast) address in the range.
    pub fn hi(&self) -> Ipv4Addr {
        let mask = get_cidr_mask(self.mask).unwrap_or(u32::MAX);
        Ipv4Addr::from((u32::from(self.addr) & mask) | !mask)
    }

    /// True when `other` lies entirely inside this range.
    pub fn contains(&self, other: &Cidr) -> bool {
        other.mask >= self.mask && other.lo() >= self.lo() && other.hi() <= self.hi()
    }
}

impl FromStr for Cidr {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self> {
        Cidr::new(s)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(de::Error::custom)
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
