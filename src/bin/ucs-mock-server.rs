// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Serves a sample UCS domain over the XML API.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use ucs_ansible::common::logging::init_logging;
use ucs_ansible::mock::{spawn_server, Args, MockServerState, MockUcs};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let ucs = MockUcs::sample();
    println!(
        "Serving {} managed objects, login {}/{}",
        ucs.len(),
        args.username,
        args.password
    );
    let state = Arc::new(Mutex::new(MockServerState::new(
        ucs,
        &args.username,
        &args.password,
    )));

    let (addr, server) = spawn_server(args.listen, state)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    println!("Mock UCS Manager listening on http://{addr}/nuova");

    tokio::select! {
        result = server => result.context("mock server task failed")?,
        _ = tokio::signal::ctrl_c() => println!("Shutting down"),
    }
    Ok(())
}
