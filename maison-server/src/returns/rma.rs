//! RMA Code Generation
//!
//! `RMA-<millis base36>-<4 random alphanumerics>`, uppercased. The
//! timestamp component makes codes roughly sortable; the random suffix
//! covers two requests landing in the same millisecond.

use rand::Rng;
use rand::distributions::Alphanumeric;

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

pub fn generate_rma() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect();
    format!("RMA-{}-{}", base36(millis), suffix).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn base36_round_trip() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1234567890), "kf12oi");
    }

    #[test]
    fn rma_shape() {
        let rma = generate_rma();
        assert!(rma.starts_with("RMA-"));
        assert_eq!(rma, rma.to_uppercase());
        let parts: Vec<&str> = rma.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn rma_codes_do_not_collide_in_practice() {
        let codes: HashSet<String> = (0..100).map(|_| generate_rma()).collect();
        assert_eq!(codes.len(), 100);
    }
}
