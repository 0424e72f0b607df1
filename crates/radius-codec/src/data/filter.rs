//! Secret-keyed obfuscation of attribute values.
//!
//! Both filters share the RFC 2865 §5.2 keystream: each 16 octet block is
//! XORed with `MD5(secret ‖ previous-ciphertext-block)`, the first block
//! being keyed by the request authenticator (and salt, for Tunnel-Password).

use crate::attributes::AttributeError;
use crate::codec::CodecContext;
use serde::{Deserialize, Serialize};

const BLOCK: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataFilter {
    /// RFC 2865 §5.2
    UserPassword,
    /// RFC 2868 §3.5
    TunnelPassword,
}

impl DataFilter {
    pub const MAX_USER_PASSWORD_LEN: usize = 128;
    /// Largest plaintext whose salted ciphertext still fits one tagged attribute
    pub const MAX_TUNNEL_PASSWORD_LEN: usize = 239;

    pub fn encode(self, ctx: &CodecContext<'_>, plain: &[u8]) -> Result<Vec<u8>, AttributeError> {
        match self {
            DataFilter::UserPassword => encode_user_password(ctx, plain),
            DataFilter::TunnelPassword => encode_tunnel_password(ctx, plain),
        }
    }

    /// `None` if `cipher` is not a valid ciphertext for this filter.
    pub fn decode(self, ctx: &CodecContext<'_>, cipher: &[u8]) -> Option<Vec<u8>> {
        match self {
            DataFilter::UserPassword => decode_user_password(ctx, cipher),
            DataFilter::TunnelPassword => decode_tunnel_password(ctx, cipher),
        }
    }
}

fn pad(mut data: Vec<u8>) -> Vec<u8> {
    let padded = data.len().div_ceil(BLOCK).max(1) * BLOCK;
    data.resize(padded, 0);
    data
}

/// XOR `input` with the chained keystream. `seed` keys the first block,
/// every later block is keyed by the preceding ciphertext block.
fn crypt(secret: &[u8], seed: &[&[u8]], input: &[u8], encrypt: bool) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());

    for (i, block) in input.chunks(BLOCK).enumerate() {
        let mut md5 = md5::Context::new();
        md5.consume(secret);
        if i == 0 {
            for part in seed {
                md5.consume(*part);
            }
        } else if encrypt {
            md5.consume(&output[(i - 1) * BLOCK..i * BLOCK]);
        } else {
            md5.consume(&input[(i - 1) * BLOCK..i * BLOCK]);
        }
        let key = md5.compute();
        output.extend(block.iter().zip(key.0.iter()).map(|(b, k)| b ^ k));
    }
    output
}

fn encode_user_password(ctx: &CodecContext<'_>, plain: &[u8]) -> Result<Vec<u8>, AttributeError> {
    if plain.len() > DataFilter::MAX_USER_PASSWORD_LEN {
        return Err(AttributeError::PasswordTooLong {
            len: plain.len(),
            max: DataFilter::MAX_USER_PASSWORD_LEN,
        });
    }
    if plain.is_empty() {
        return Ok(Vec::new());
    }
    let padded = pad(plain.to_vec());
    Ok(crypt(ctx.secret(), &[ctx.authenticator().as_slice()], &padded, true))
}

fn decode_user_password(ctx: &CodecContext<'_>, cipher: &[u8]) -> Option<Vec<u8>> {
    if cipher.is_empty() {
        return Some(Vec::new());
    }
    if cipher.len() % BLOCK != 0 || cipher.len() > DataFilter::MAX_USER_PASSWORD_LEN {
        return None;
    }
    let mut plain = crypt(ctx.secret(), &[ctx.authenticator().as_slice()], cipher, false);
    let end = plain.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    plain.truncate(end);
    Some(plain)
}

fn encode_tunnel_password(
    ctx: &CodecContext<'_>,
    plain: &[u8],
) -> Result<Vec<u8>, AttributeError> {
    if plain.len() > DataFilter::MAX_TUNNEL_PASSWORD_LEN {
        return Err(AttributeError::PasswordTooLong {
            len: plain.len(),
            max: DataFilter::MAX_TUNNEL_PASSWORD_LEN,
        });
    }
    let mut salt = [0u8; 2];
    ctx.random().fill_bytes(&mut salt);
    salt[0] |= 0x80;

    let mut data = Vec::with_capacity(1 + plain.len());
    data.push(plain.len() as u8);
    data.extend_from_slice(plain);
    let padded = pad(data);

    let mut out = salt.to_vec();
    out.extend(crypt(ctx.secret(), &[ctx.authenticator().as_slice(), &salt[..]], &padded, true));
    Ok(out)
}

fn decode_tunnel_password(ctx: &CodecContext<'_>, cipher: &[u8]) -> Option<Vec<u8>> {
    if cipher.len() < 2 + BLOCK || (cipher.len() - 2) % BLOCK != 0 {
        return None;
    }
    let (salt, body) = cipher.split_at(2);
    if salt[0] & 0x80 == 0 {
        return None;
    }
    let plain = crypt(ctx.secret(), &[ctx.authenticator().as_slice(), salt], body, false);
    let len = usize::from(plain[0]);
    if len > plain.len() - 1 {
        return None;
    }
    Some(plain[1..1 + len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RandomSource;

    const SECRET: &[u8] = b"xyzzy5461";
    const AUTHENTICATOR: [u8; 16] = [
        0x0f, 0x40, 0x3f, 0x94, 0x73, 0x97, 0x80, 0x57, 0xbd, 0x83, 0xd5, 0xcb, 0x98, 0xf4, 0x22,
        0x7a,
    ];

    struct FixedRandom(u8);

    impl RandomSource for FixedRandom {
        fn fill_bytes(&self, dest: &mut [u8]) {
            dest.fill(self.0);
        }
    }

    fn ctx(random: &FixedRandom) -> CodecContext<'_> {
        CodecContext::new(SECRET, AUTHENTICATOR, random)
    }

    #[test]
    fn test_user_password_rfc2865_vector() {
        let random = FixedRandom(0);
        let cipher = DataFilter::UserPassword
            .encode(&ctx(&random), b"arctangent")
            .unwrap();
        assert_eq!(cipher, hex::decode("0dbe708d93d413ce3196e43f782a0aee").unwrap());
        assert_eq!(
            DataFilter::UserPassword.decode(&ctx(&random), &cipher),
            Some(b"arctangent".to_vec())
        );
    }

    #[test]
    fn test_user_password_short_and_multi_block() {
        let random = FixedRandom(0);
        let short = DataFilter::UserPassword.encode(&ctx(&random), b"abc").unwrap();
        assert_eq!(short, hex::decode("0dae70f9f2ba74ab5fe2e43f782a0aee").unwrap());

        let long = DataFilter::UserPassword
            .encode(&ctx(&random), b"correct-horse-battery")
            .unwrap();
        assert_eq!(
            long,
            hex::decode("0fa3618b97d90086378d964c1d07688fcc7acfcfb19aa152053016cc0af2b43d").unwrap()
        );
        assert_eq!(
            DataFilter::UserPassword.decode(&ctx(&random), &long),
            Some(b"correct-horse-battery".to_vec())
        );
        assert_eq!(
            DataFilter::UserPassword.decode(&ctx(&random), &short),
            Some(b"abc".to_vec())
        );
    }

    #[test]
    fn test_user_password_empty() {
        let random = FixedRandom(0);
        assert_eq!(DataFilter::UserPassword.encode(&ctx(&random), b"").unwrap(), Vec::<u8>::new());
        assert_eq!(DataFilter::UserPassword.decode(&ctx(&random), &[]), Some(Vec::new()));
    }

    #[test]
    fn test_user_password_limits() {
        let random = FixedRandom(0);
        assert!(DataFilter::UserPassword.encode(&ctx(&random), &[b'a'; 128]).is_ok());
        assert_eq!(
            DataFilter::UserPassword.encode(&ctx(&random), &[b'a'; 129]),
            Err(AttributeError::PasswordTooLong { len: 129, max: 128 })
        );
        assert_eq!(DataFilter::UserPassword.decode(&ctx(&random), &[0; 15]), None);
        assert_eq!(DataFilter::UserPassword.decode(&ctx(&random), &[0; 144]), None);
    }

    #[test]
    fn test_tunnel_password_vector() {
        let random = FixedRandom(0x3a);
        let cipher = DataFilter::TunnelPassword
            .encode(&ctx(&random), b"tunnel-secret")
            .unwrap();
        // Salt high bit forced on
        assert_eq!(&cipher[..2], &[0xba, 0x3a]);
        assert_eq!(cipher, hex::decode("ba3aa7f7a9bb594a374f5bbfc51fdc14881d").unwrap());
        assert_eq!(
            DataFilter::TunnelPassword.decode(&ctx(&random), &cipher),
            Some(b"tunnel-secret".to_vec())
        );
    }

    #[test]
    fn test_tunnel_password_multi_block() {
        let random = FixedRandom(0x11);
        let plain = vec![b'x'; 40];
        let cipher = DataFilter::TunnelPassword.encode(&ctx(&random), &plain).unwrap();
        assert_eq!(cipher.len(), 2 + 48);
        assert_eq!(DataFilter::TunnelPassword.decode(&ctx(&random), &cipher), Some(plain));
    }

    #[test]
    fn test_tunnel_password_rejects_malformed() {
        let random = FixedRandom(0x3a);
        let filter = DataFilter::TunnelPassword;
        assert_eq!(filter.decode(&ctx(&random), &[0x80; 17]), None);
        assert_eq!(filter.decode(&ctx(&random), &[0x80; 19]), None);

        let mut cipher = filter.encode(&ctx(&random), b"tunnel-secret").unwrap();
        cipher[0] &= 0x7f;
        assert_eq!(filter.decode(&ctx(&random), &cipher), None);

        assert!(filter.encode(&ctx(&random), &[0; 240]).is_err());
    }
}
