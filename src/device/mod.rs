//! Push notification tokens registered by a user's devices.

mod db;
mod domain;
mod endpoints;

pub use db::{create_device_table, delete_device, find_device, register_device};
pub use domain::{Device, DeviceError, DeviceInfo, DeviceToken};
pub use endpoints::{delete_device_endpoint, put_device_endpoint};
