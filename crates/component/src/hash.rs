use md5::{Digest, Md5};

/// Hashes an ordered sequence of values into a hex digest.
///
/// Values are fed as raw UTF-8 bytes without separators, so
/// `["ab", "c"]` and `["a", "bc"]` hash identically.
pub fn hash_from_values<I, S>(values: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut hasher = Md5::new();
	for value in values {
		hasher.update(value.as_ref().as_bytes());
	}
	format!("{:x}", hasher.finalize())
}
