use crate::vfs::VirtualFileSystem;

const HASH_PREFIX_LEN: usize = 16;

/// Content-derived key used to decide whether the preview must re-render.
///
/// Each file contributes `path:hash` where hash is a truncated BLAKE3 digest of
/// its content, so two edits of equal length still produce different keys.
pub fn change_key(vfs: &VirtualFileSystem) -> String {
    vfs.iter()
        .map(|(path, content)| {
            let hash = blake3::hash(content.as_bytes()).to_hex();
            format!("{}:{}", path, &hash.as_str()[..HASH_PREFIX_LEN])
        })
        .collect::<Vec<_>>()
        .join("|")
}
