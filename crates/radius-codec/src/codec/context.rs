use rand::RngCore;

/// Source of cryptographically secure random bytes, used for request
/// authenticators and Tunnel-Password salts.
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// [`RandomSource`] backed by the thread-local CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::rng().fill_bytes(dest);
    }
}

/// Per-operation inputs shared by every codec call.
///
/// `authenticator` is always the request authenticator, also while encoding
/// or decoding the matching response.
#[derive(Clone, Copy)]
pub struct CodecContext<'a> {
    secret: &'a [u8],
    authenticator: [u8; 16],
    random: &'a dyn RandomSource,
}

impl<'a> CodecContext<'a> {
    pub fn new(secret: &'a [u8], authenticator: [u8; 16], random: &'a dyn RandomSource) -> Self {
        CodecContext {
            secret,
            authenticator,
            random,
        }
    }

    pub fn secret(&self) -> &'a [u8] {
        self.secret
    }

    pub fn authenticator(&self) -> &[u8; 16] {
        &self.authenticator
    }

    pub fn random(&self) -> &'a dyn RandomSource {
        self.random
    }
}

impl std::fmt::Debug for CodecContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret
        f.debug_struct("CodecContext")
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}
