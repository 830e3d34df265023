use super::prelude::*;
use crate::gateways::file::FileStore;

/// Store an image of a space and attach it to the space.
///
/// Uploading an image with the same file name again replaces
/// the existing file. The file is written last, so a failed
/// update leaves nothing behind and a failed write can be
/// rolled back together with the update.
pub fn upload_space_image<R, F>(
    repo: &R,
    files: &F,
    space_id: &str,
    file_name: &str,
    data: &[u8],
    uploaded_by: Option<&UserRef>,
) -> Result<ImageRef>
where
    R: SpaceRepo,
    F: FileStore + ?Sized,
{
    let _ = super::signed_in(uploaded_by)?;
    let mut space = repo.get_space(space_id)?;
    let image = ImageRef::new(&space.id, file_name)?;
    if !space.images.contains(&image) {
        space.images.push(image.clone());
        repo.update_space(&space)?;
    }
    files
        .put_file(image.as_str(), data)
        .map_err(Error::Gateway)?;
    log::debug!("Uploaded image {image} ({} bytes)", data.len());
    Ok(image)
}
