//! Browser services: the EIP-1193 bridge, the connection adapter and the
//! contract service wired to both.

pub mod connector;
pub mod eip1193;

use std::rc::Rc;

use leptos::prelude::*;
use lib_core::config::Config;
use lib_core::error::Result;
use lib_web3::{RpcReader, Web3Service};

use crate::services::eip1193::BrowserSigners;

pub use connector::{provide_connection_adapter, use_connection_adapter, ConnectStatus, ConnectionAdapter};

/// Contract service as used by the browser app.
pub type PresaleService = Web3Service<RpcReader, BrowserSigners>;

/// Context handle for the shared [`PresaleService`].
///
/// The service is not `Send` (it holds browser-only futures), so it lives
/// in thread-local storage behind a `Copy` handle.
#[derive(Clone, Copy)]
pub struct ServiceContext {
    service: StoredValue<Rc<PresaleService>, LocalStorage>,
}

impl ServiceContext {
    pub fn get(&self) -> Rc<PresaleService> {
        self.service.get_value()
    }
}

pub fn provide_service_context(config: &Config, adapter: ConnectionAdapter) -> Result<ServiceContext> {
    let reader = RpcReader::new(&config.rpc_url)?;
    let service = Web3Service::new(config, reader, BrowserSigners::new(adapter.active))?;
    let context = ServiceContext {
        service: StoredValue::new_local(Rc::new(service)),
    };
    provide_context(context);
    Ok(context)
}

pub fn use_service_context() -> ServiceContext {
    expect_context::<ServiceContext>()
}
