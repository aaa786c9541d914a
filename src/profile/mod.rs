//! The acting user's profile: picture and own uploads.

use std::path::Path;

use crate::error::{NyimboError, Result};
use crate::sheet::require_user;
use crate::store::{CatalogStore, ObjectStore, ProfileStore};
use crate::types::{PROFILE_PICS_PREFIX, SheetRecord, UserProfile};

const INVALID_IMAGE: &str = "Please select an image file.";
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// A user's profile document together with their uploads, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub user: String,
    pub profile: UserProfile,
    pub sheets: Vec<SheetRecord>,
}

fn image_name(path: &Path) -> Result<String> {
    let is_image = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)));
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|_| is_image)
        .map(str::to_string)
        .ok_or_else(|| NyimboError::Validation(INVALID_IMAGE.to_string()))
}

/// Load the acting user's profile and their sheets.
pub async fn view_profile<S, P>(store: &S, profiles: &P, user: Option<&str>) -> Result<ProfileView>
where
    S: CatalogStore + ?Sized,
    P: ProfileStore + ?Sized,
{
    let user = require_user(user, "view your profile")?;
    let profile = profiles.get_profile(user).await?.unwrap_or_default();
    let sheets = store.list_by_uploader(user).await?;
    Ok(ProfileView {
        user: user.to_string(),
        profile,
        sheets,
    })
}

/// Store a new profile picture under `profile_pics/<user>/<file name>` and
/// record its URL on the user's profile.
pub async fn update_profile_picture<P, O>(
    profiles: &P,
    objects: &O,
    user: Option<&str>,
    picture: &Path,
) -> Result<UserProfile>
where
    P: ProfileStore + ?Sized,
    O: ObjectStore + ?Sized,
{
    let user = require_user(user, "update your profile picture")?;
    let name = image_name(picture)?;
    let bytes = tokio::fs::read(picture).await?;

    let key = format!("{PROFILE_PICS_PREFIX}/{user}/{name}");
    objects.put(&key, bytes).await?;
    let url = objects.url_for(&key).await?;

    let update = UserProfile {
        profile_pic_url: Some(url),
    };
    profiles.merge_profile(user, &update).await?;

    tracing::info!("Updated profile picture for {user}");
    Ok(profiles.get_profile(user).await?.unwrap_or(update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryObjectStore, MemoryProfileStore, MemoryStore};
    use crate::types::SheetId;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"\x89PNG test").unwrap();
        path
    }

    #[tokio::test]
    async fn test_update_picture_stores_object_and_url() {
        let dir = TempDir::new().unwrap();
        let profiles = MemoryProfileStore::new();
        let objects = MemoryObjectStore::new();

        let profile =
            update_profile_picture(&profiles, &objects, Some("u1"), &write_file(&dir, "me.PNG"))
                .await
                .unwrap();

        assert_eq!(
            profile.profile_pic_url.as_deref(),
            Some("memory://profile_pics/u1/me.PNG")
        );
        assert!(objects.get("profile_pics/u1/me.PNG").is_some());
        assert_eq!(profiles.get_profile("u1").await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_update_picture_requires_login_and_image() {
        let dir = TempDir::new().unwrap();
        let profiles = MemoryProfileStore::new();
        let objects = MemoryObjectStore::new();

        let err = update_profile_picture(&profiles, &objects, None, &write_file(&dir, "me.png"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "You must be logged in to update your profile picture."
        );

        let err =
            update_profile_picture(&profiles, &objects, Some("u1"), &write_file(&dir, "me.pdf"))
                .await
                .unwrap_err();
        assert_eq!(err.to_string(), INVALID_IMAGE);
        assert_eq!(profiles.get_profile("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_view_profile_without_picture() {
        let store = MemoryStore::with_sheets(vec![
            SheetRecord {
                id: SheetId::new("mine"),
                title: Some("Amen".to_string()),
                uploaded_by: Some("u1".to_string()),
                ..Default::default()
            },
            SheetRecord {
                id: SheetId::new("theirs"),
                uploaded_by: Some("u2".to_string()),
                ..Default::default()
            },
        ]);

        let view = view_profile(&store, &MemoryProfileStore::new(), Some("u1"))
            .await
            .unwrap();

        assert_eq!(view.user, "u1");
        assert_eq!(view.profile.profile_pic_url, None);
        assert_eq!(view.sheets.len(), 1);
        assert_eq!(view.sheets[0].id.as_str(), "mine");
    }

    #[tokio::test]
    async fn test_view_profile_requires_login() {
        assert!(matches!(
            view_profile(&MemoryStore::new(), &MemoryProfileStore::new(), None).await,
            Err(NyimboError::NotLoggedIn(_))
        ));
    }
}
