//! Data types for Pushbullet API requests and responses.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Identifier of a registered device.
pub type DeviceId = i64;

/// A device registered with Pushbullet, as reported by the devices endpoint.
///
/// The upstream schema is loosely typed: missing or `null` values decode as
/// `None`, an empty `extras`, or an id of `0`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Device {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: DeviceId,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extras: DeviceExtras,
}

impl Device {
    /// Human-readable label: the nickname if set, otherwise the model.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.extras
            .nickname
            .as_deref()
            .or(self.extras.model.as_deref())
    }
}

/// Hardware and app details attached to a [`Device`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceExtras {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub android_version: Option<String>,
    pub sdk_version: Option<String>,
    pub app_version: Option<i64>,
    pub nickname: Option<String>,
}

/// Response from the devices endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevicesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<Device>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_devices: Vec<Device>,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DevicesResponse {
    /// Owned devices followed by shared devices, in server order.
    ///
    /// A device present in both lists appears twice.
    #[must_use]
    pub fn into_devices(self) -> Vec<Device> {
        let mut devices = self.devices;
        devices.extend(self.shared_devices);
        devices
    }
}

/// Recipient of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Every device registered to the account. No `device_id` is sent.
    AllDevices,
    /// A single device.
    ///
    /// `Device(0)` is sent as a broadcast: the service reads id `0` as
    /// "all devices". Build targets from raw ids with [`Target::from`] to get
    /// [`Target::AllDevices`] explicitly.
    Device(DeviceId),
}

impl Target {
    /// The `device_id` form value for this target, if any.
    ///
    /// `Device(0)` yields `None`: the service reads `0` as "all devices", so it
    /// is never sent as an explicit target.
    #[must_use]
    pub const fn device_id(self) -> Option<DeviceId> {
        match self {
            Self::Device(id) if id != 0 => Some(id),
            _ => None,
        }
    }
}

/// Upstream convention: device id `0` addresses every device.
impl From<DeviceId> for Target {
    fn from(id: DeviceId) -> Self {
        if id == 0 {
            Self::AllDevices
        } else {
            Self::Device(id)
        }
    }
}

impl From<Option<DeviceId>> for Target {
    fn from(id: Option<DeviceId>) -> Self {
        id.map_or(Self::AllDevices, Self::from)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllDevices => f.write_str("all devices"),
            Self::Device(id) => write!(f, "device {id}"),
        }
    }
}
