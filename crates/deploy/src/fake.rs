//! In-memory gateway used by unit tests.

use std::sync::Mutex;

use wingflow_panel::{GatewayFuture, PanelError, PowerSignal, RemoteGateway};

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    TestConnection,
    ListRootFiles,
    Compress(Vec<String>),
    Delete(Vec<String>),
    Power(PowerSignal),
    Write(String, Vec<u8>),
}

/// Gateway fake that records every call and fails on demand.
#[derive(Debug, Default)]
pub(crate) struct FakePanel {
    pub listing: Vec<String>,
    pub fail_connection: bool,
    pub fail_listing: bool,
    pub fail_compress: bool,
    pub fail_delete: bool,
    pub fail_power: bool,
    pub failing_writes: Vec<String>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakePanel {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Remote paths passed to `write_file`, in call order.
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Write(path, _) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn api_error(status: u16) -> PanelError {
    PanelError::Api {
        status,
        body: "mock failure".into(),
    }
}

impl RemoteGateway for FakePanel {
    fn test_connection(&self) -> GatewayFuture<'_, u16> {
        self.record(Call::TestConnection);
        Box::pin(async move {
            if self.fail_connection {
                Err(api_error(401))
            } else {
                Ok(200)
            }
        })
    }

    fn list_root_files(&self) -> GatewayFuture<'_, Vec<String>> {
        self.record(Call::ListRootFiles);
        Box::pin(async move {
            if self.fail_listing {
                Err(api_error(500))
            } else {
                Ok(self.listing.clone())
            }
        })
    }

    fn compress_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, String> {
        self.record(Call::Compress(names.to_vec()));
        Box::pin(async move {
            if self.fail_compress {
                Err(api_error(500))
            } else {
                Ok("archive-test.tar.gz".to_string())
            }
        })
    }

    fn delete_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, ()> {
        self.record(Call::Delete(names.to_vec()));
        Box::pin(async move {
            if self.fail_delete {
                Err(api_error(500))
            } else {
                Ok(())
            }
        })
    }

    fn set_power(&self, signal: PowerSignal) -> GatewayFuture<'_, ()> {
        self.record(Call::Power(signal));
        Box::pin(async move {
            if self.fail_power {
                Err(api_error(409))
            } else {
                Ok(())
            }
        })
    }

    fn write_file<'a>(&'a self, remote_path: &'a str, contents: Vec<u8>) -> GatewayFuture<'a, ()> {
        self.record(Call::Write(remote_path.to_string(), contents));
        Box::pin(async move {
            if self.failing_writes.iter().any(|p| p == remote_path) {
                Err(api_error(500))
            } else {
                Ok(())
            }
        })
    }
}
