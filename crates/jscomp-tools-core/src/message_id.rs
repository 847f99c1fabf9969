//! Closure Compiler message ids.
//!
//! Ids are 63-bit fingerprints of the message text combined with its meaning,
//! written in decimal. They must match what the compiler computes for
//! `goog.getMsg` calls, so the arithmetic here mirrors its 32-bit lookup2
//! hash exactly, wrapping included.

use std::fmt;

const GOLDEN_RATIO: u32 = 0x9e37_79b9;
const LOW_SEED: u32 = 102_072;
const ID_MASK: u64 = 0x7fff_ffff_ffff_ffff;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value & ID_MASK)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MessageId> for u64 {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

/// Generates ids scoped to a project, the way the compiler does when it is
/// given a translations project id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageIdGenerator {
    project_id: Option<String>,
}

impl MessageIdGenerator {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
        }
    }

    pub fn unscoped() -> Self {
        Self { project_id: None }
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn generate_id<S: AsRef<str>>(&self, meaning: &str, parts: &[S]) -> MessageId {
        let text: String = parts.iter().map(AsRef::as_ref).collect();
        let scoped_meaning = match &self.project_id {
            Some(project) => format!("{project}: {meaning}"),
            None => meaning.to_string(),
        };
        message_id(&text, &scoped_meaning)
    }
}

pub fn message_id(message: &str, meaning: &str) -> MessageId {
    let mut fp = fingerprint(message.as_bytes());
    if !meaning.is_empty() {
        let meaning_fp = fingerprint(meaning.as_bytes());
        // rotate the message fingerprint left by one before folding it in
        let carry = fp >> 63;
        fp = meaning_fp.wrapping_add(fp << 1).wrapping_add(carry);
    }
    MessageId::new(fp)
}

pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hi = hash32(bytes, 0);
    let mut lo = hash32(bytes, LOW_SEED);
    if hi == 0 && (lo == 0 || lo == 1) {
        hi ^= 0x130f_9bef;
        lo ^= 0x94a0_a928;
    }
    (u64::from(hi) << 32) | u64::from(lo)
}

fn hash32(bytes: &[u8], seed: u32) -> u32 {
    let mut a = GOLDEN_RATIO;
    let mut b = GOLDEN_RATIO;
    let mut c = seed;

    let mut blocks = bytes.chunks_exact(12);
    for block in &mut blocks {
        a = a.wrapping_add(u32::from_le_bytes([block[0], block[1], block[2], block[3]]));
        b = b.wrapping_add(u32::from_le_bytes([block[4], block[5], block[6], block[7]]));
        c = c.wrapping_add(u32::from_le_bytes([block[8], block[9], block[10], block[11]]));
        (a, b, c) = mix(a, b, c);
    }

    c = c.wrapping_add(bytes.len() as u32);
    // the low byte of c is reserved for the length
    for (idx, byte) in blocks.remainder().iter().enumerate() {
        let value = u32::from(*byte);
        match idx {
            0..=3 => a = a.wrapping_add(value << (8 * idx)),
            4..=7 => b = b.wrapping_add(value << (8 * (idx - 4))),
            _ => c = c.wrapping_add(value << (8 * (idx - 7))),
        }
    }

    let (_, _, c) = mix(a, b, c);
    c
}

fn mix(mut a: u32, mut b: u32, mut c: u32) -> (u32, u32, u32) {
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 13);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 8);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 13);
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 12);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 16);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 5);
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 3);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 10);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 15);
    (a, b, c)
}

#[cfg(test)]
mod tests {
    use super::{MessageId, MessageIdGenerator, fingerprint, message_id};

    const FP_EMPTY: u64 = 0xbd49_d10d_10cb_ee50;
    const FP_HELLO: u64 = 0x362a_1b28_7dd4_a094;
    const FP_FOX: u64 = 0x7283_93b1_9caf_03b1;
    const ID_HELLO_NO_MEANING: u64 = 3_902_961_887_793_684_628;
    const ID_GREETING: u64 = 6_777_587_664_527_538_828;

    #[test]
    fn fingerprint_matches_reference_values() {
        assert_eq!(fingerprint(b""), FP_EMPTY);
        assert_eq!(fingerprint(b"Hello"), FP_HELLO);
        assert_eq!(fingerprint(b"The quick brown fox jumps"), FP_FOX);
    }

    #[test]
    fn message_id_matches_reference_values() {
        assert_eq!(message_id("Hello", "").get(), ID_HELLO_NO_MEANING);
        assert_eq!(message_id("Hello", "myproj: MSG_GREETING").get(), ID_GREETING);
    }

    #[test]
    fn generator_scopes_meaning_with_project() {
        let generator = MessageIdGenerator::new("myproj");
        let id = generator.generate_id("MSG_GREETING", &["Hello"]);
        assert_eq!(id, message_id("Hello", "myproj: MSG_GREETING"));
        assert_eq!(id.to_string(), ID_GREETING.to_string());
    }

    #[test]
    fn generator_joins_message_parts() {
        let generator = MessageIdGenerator::new("p");
        let joined = generator.generate_id("MSG_A", &["Hello, ", "world"]);
        let whole = generator.generate_id("MSG_A", &["Hello, world"]);
        assert_eq!(joined, whole);
    }

    #[test]
    fn ids_are_deterministic() {
        let generator = MessageIdGenerator::new("myproj");
        let first = generator.generate_id("MSG_TITLE", &["Title"]);
        let second = generator.generate_id("MSG_TITLE", &["Title"]);
        assert_eq!(first, second);
    }

    #[test]
    fn project_meaning_and_text_all_change_the_id() {
        let base = MessageIdGenerator::new("a").generate_id("MSG_X", &["text"]);
        assert_ne!(base, MessageIdGenerator::new("b").generate_id("MSG_X", &["text"]));
        assert_ne!(base, MessageIdGenerator::new("a").generate_id("MSG_Y", &["text"]));
        assert_ne!(base, MessageIdGenerator::new("a").generate_id("MSG_X", &["other"]));
        assert_ne!(base, MessageIdGenerator::unscoped().generate_id("MSG_X", &["text"]));
    }

    #[test]
    fn ids_fit_in_63_bits() {
        let generator = MessageIdGenerator::new("myproj");
        for key in ["a", "bb", "a much longer message that spans several blocks"] {
            let id = generator.generate_id("MSG_KEY", &[key]);
            assert_eq!(id.get() >> 63, 0);
        }
        assert_eq!(MessageId::new(u64::MAX).get(), i64::MAX as u64);
    }
}
