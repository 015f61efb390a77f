use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub fn generate_session_id() -> String {
    generate_token(32)
}

pub fn generate_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Random number used to disambiguate stored upload names.
pub fn upload_suffix() -> u32 {
    thread_rng().gen_range(0..1_000_000_000)
}
