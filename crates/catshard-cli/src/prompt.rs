//! Interactive source selection for `catshard merge`.

use std::io::{BufRead, Write};

use catshard_core::SourceId;

pub(crate) const SOURCE_PROMPT: &str = "結合対象のファイル種別 c (cando) or w (watts): ";

/// Asks the operator which source to merge.
///
/// Returns `None` when the answer is not a known key or input ended; the
/// caller treats that as a cancelled merge.
///
/// # Errors
///
/// Returns an I/O error if the prompt cannot be written or the answer read.
pub(crate) fn select_source<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> std::io::Result<Option<SourceId>> {
    output.write_all(SOURCE_PROMPT.as_bytes())?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(None);
    }
    Ok(SourceId::from_prompt_key(&answer))
}
