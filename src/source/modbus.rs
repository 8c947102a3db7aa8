//! Modbus TCP register source.

use crate::registers::RegisterBlock;
use crate::source::{FetchError, RegisterSource};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use tokio_modbus::client::Context;
use tokio_modbus::prelude::*;

/// Register source backed by a shared Modbus TCP connection.
///
/// All modules sit behind one RS-485 gateway, so a single connection serves
/// every unit id; `fetch` switches the addressed slave per call.
pub struct ModbusSource {
    ctx: Context,
}

impl ModbusSource {
    /// Connect to the Modbus TCP gateway at `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self, FetchError> {
        let addr = resolve(host, port).await?;
        let ctx = tcp::connect(addr)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(ModbusSource { ctx })
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, FetchError> {
    tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?
        .next()
        .ok_or_else(|| FetchError::Transport(format!("no address found for {host}:{port}")))
}

impl RegisterSource for ModbusSource {
    fn fetch(
        &mut self,
        unit: u8,
        start: u16,
        end: u16,
    ) -> Pin<Box<dyn Future<Output = Result<RegisterBlock, FetchError>> + Send + '_>> {
        Box::pin(async move {
            self.ctx.set_slave(Slave(unit));
            let count = end.saturating_sub(start) + 1;
            let words = self
                .ctx
                .read_holding_registers(start, count)
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?
                .map_err(|e| FetchError::Exception(e.to_string()))?;
            Ok(RegisterBlock::new(start, end, words)?)
        })
    }
}
