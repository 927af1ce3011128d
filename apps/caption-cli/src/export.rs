use caption_styler::{BatchSlot, CaptionBatch, EXPORT_MIME_TYPE};
use std::{io::Write, path::Path};

/// Print every slot as `Option {n}: ...`, numbered from 1.
pub fn print_batch(batch: &CaptionBatch, mut out: impl Write) -> std::io::Result<()> {
    for (index, slot) in batch.slots().iter().enumerate() {
        match slot {
            BatchSlot::Caption(caption) => writeln!(out, "Option {}: {}\n", index + 1, caption)?,
            BatchSlot::Failed(e) => writeln!(out, "Option {}: failed, {}\n", index + 1, e)?,
        }
    }
    Ok(())
}

pub fn write_export(batch: &CaptionBatch, path: &Path) -> anyhow::Result<()> {
    let text = batch.export_text();
    std::fs::write(path, &text)?;

    tracing::info!(
        mime_type = EXPORT_MIME_TYPE,
        captions = batch.captions().count(),
        "captions exported to {}",
        path.display()
    );

    Ok(())
}
