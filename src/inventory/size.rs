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

//! Disk size formatting

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const MAX_SCALE_UPS: usize = UNITS.len() - 1;

/// Format a size with binary units, e.g. `1023 B`, `1.0 KB`, `1.5 GB`.
///
/// The value is divided by 1024 while it is at least 1024, at most four
/// times, so anything past the terabyte range stays in TB. No rounding is
/// applied: a scaled value keeps its full fractional part.
pub fn format_size(size: u64) -> String {
    if size < 1024 {
        return format!("{size} {}", UNITS[0]);
    }

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < MAX_SCALE_UPS {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", float_text(value), UNITS[unit])
}

/// Shortest round-trip text of `value`, always with a fractional part.
fn float_text(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_are_not_scaled() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_scaling() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1025), "1.0009765625 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_capped_at_terabytes() {
        let tb: u64 = 1024 * 1024 * 1024 * 1024;
        assert_eq!(format_size(tb), "1.0 TB");
        assert_eq!(format_size(2048 * tb), "2048.0 TB");
        assert!(format_size(u64::MAX).ends_with(" TB"));
    }
}
