//! Command-line argument parsing for the mock server

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

use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mock UCS Manager XML API server", long_about = None)]
pub struct Args {
    #[arg(long, default_value = "127.0.0.1:8080", help = "Address to listen on")]
    pub listen: SocketAddr,

    #[arg(long, default_value = "admin", help = "Accepted login name")]
    pub username: String,

    #[arg(long, default_value = "password", help = "Accepted login password")]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["ucs-mock-server"]);
        assert_eq!(args.listen.port(), 8080);
        assert_eq!(args.username, "admin");
    }

    #[test]
    fn test_listen_override() {
        let args = Args::parse_from(["ucs-mock-server", "--listen", "0.0.0.0:9443"]);
        assert_eq!(args.listen.to_string(), "0.0.0.0:9443");
    }
}
