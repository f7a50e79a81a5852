//! Finding and opening the synth's serial port

use std::time::Duration;

use anyhow::{Context, anyhow};
use dialoguer::Select;
use serialport::{
    DataBits, SerialPort, SerialPortInfo, SerialPortType, StopBits, available_ports,
};
use tracing::info;

/// How to talk to the synth's USART
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Skip discovery and use this port
    pub port: Option<String>,
    pub baud_rate: u32,
    pub timeout: Duration,
}

/// A serial port as shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub port_name: String,
    pub description: String,
}

impl From<&SerialPortInfo> for DeviceInfo {
    fn from(info: &SerialPortInfo) -> Self {
        let description = match &info.port_type {
            SerialPortType::UsbPort(usb) => format!(
                "{} ({}, PID: {:04x})",
                info.port_name,
                usb.manufacturer.as_deref().unwrap_or("unknown"),
                usb.pid
            ),
            _ => info.port_name.clone(),
        };

        Self {
            port_name: info.port_name.clone(),
            description,
        }
    }
}

pub fn list_devices() -> anyhow::Result<Vec<DeviceInfo>> {
    let ports = available_ports().context("Failed to enumerate serial ports")?;
    Ok(ports.iter().map(DeviceInfo::from).collect())
}

/// Pick a port: the configured one, the only one, or ask
pub fn select_port(config: &SerialConfig) -> anyhow::Result<String> {
    if let Some(port) = &config.port {
        return Ok(port.clone());
    }

    let devices = list_devices()?;

    match devices.as_slice() {
        [] => Err(anyhow!("No serial ports found! Are you in the dialout group?")),
        [device] => {
            println!("Using {}", device.description);
            Ok(device.port_name.clone())
        }
        devices => {
            let descriptions: Vec<&str> = devices.iter().map(|d| d.description.as_str()).collect();

            let selected = Select::new()
                .with_prompt("Select the synth's serial port")
                .default(0)
                .items(&descriptions)
                .interact()
                .context("Port selection was cancelled")?;

            Ok(devices[selected].port_name.clone())
        }
    }
}

/// Open the port with the synth's line settings (8 data bits, 1 stop bit)
pub fn open(port_name: &str, config: &SerialConfig) -> anyhow::Result<Box<dyn SerialPort>> {
    info!(port_name, baud = config.baud_rate, "opening serial port");

    serialport::new(port_name, config.baud_rate)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .timeout(config.timeout)
        .open()
        .with_context(|| format!("Failed to open {port_name}"))
}
