use crate::BenchError;

/// Check that the first `len` bytes of `decrypted` equal those of `original`.
///
/// Exact equality is the only accepted outcome. A buffer shorter than `len`
/// is a mismatch at its end.
pub fn validate(len: usize, decrypted: &[u8], original: &[u8]) -> Result<(), BenchError> {
    let a = &decrypted[..len.min(decrypted.len())];
    let b = &original[..len.min(original.len())];

    if let Some(offset) = a.iter().zip(b).position(|(x, y)| x != y) {
        return Err(BenchError::ValidationMismatch { offset });
    }

    let shortest = a.len().min(b.len());
    if shortest < len {
        return Err(BenchError::ValidationMismatch { offset: shortest });
    }

    Ok(())
}
