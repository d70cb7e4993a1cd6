//! Remote gateway trait.
//!
//! The deploy core only sees pass/fail plus an error detail; headers, auth
//! and routes stay inside the implementation.

use std::future::Future;
use std::pin::Pin;

use crate::PanelError;
use crate::signal::PowerSignal;

/// A boxed future returned by gateway methods.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PanelError>> + Send + 'a>>;

/// Abstract connection to the hosting panel.
///
/// [`crate::Client`] implements this over HTTP. Using a trait keeps the
/// deploy state machine testable with in-memory fakes.
pub trait RemoteGateway: Send + Sync {
    /// Probes the server endpoint. Returns the response status on success.
    fn test_connection(&self) -> GatewayFuture<'_, u16>;

    /// Names of the entries in the server's root directory.
    fn list_root_files(&self) -> GatewayFuture<'_, Vec<String>>;

    /// Compresses root entries into an archive on the server and returns
    /// the archive's file name.
    fn compress_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, String>;

    /// Deletes root entries in one request.
    fn delete_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, ()>;

    /// Sends a power signal.
    fn set_power(&self, signal: PowerSignal) -> GatewayFuture<'_, ()>;

    /// Writes `contents` to an absolute remote path, replacing any file there.
    fn write_file<'a>(&'a self, remote_path: &'a str, contents: Vec<u8>) -> GatewayFuture<'a, ()>;
}
