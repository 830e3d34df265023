use anyhow::anyhow;
use diesel::{
    self,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use num_traits::{FromPrimitive as _, ToPrimitive as _};

use psdb_core::{
    entities::*,
    repositories::{self as repo, *},
};

use super::*;

mod comment;
mod space;

#[cfg(test)]
mod tests;

type Result<T> = std::result::Result<T, repo::Error>;

pub fn from_diesel_err(err: DieselError) -> repo::Error {
    match err {
        DieselError::NotFound => repo::Error::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            repo::Error::AlreadyExists
        }
        _ => repo::Error::Other(err.into()),
    }
}

fn read_only_err() -> repo::Error {
    repo::Error::Other(anyhow!("Write access denied on a read-only connection"))
}

fn resolve_space_rowid(conn: &mut SqliteConnection, id: &str) -> Result<i64> {
    use schema::space::dsl;
    schema::space::table
        .select(dsl::rowid)
        .filter(dsl::id.eq(id))
        .first::<i64>(conn)
        .map_err(|e| {
            log::debug!("Failed to resolve space id '{}': {}", id, e);
            e
        })
        .map_err(from_diesel_err)
}

fn load_space_images(conn: &mut SqliteConnection, space_rowid: i64) -> Result<Vec<ImageRef>> {
    use schema::space_image::dsl;
    Ok(schema::space_image::table
        .select(dsl::path)
        .filter(dsl::parent_rowid.eq(space_rowid))
        .order_by(dsl::position)
        .load::<String>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .filter_map(|path| {
            path.parse::<ImageRef>()
                .map_err(|err| {
                    // This should never happen if paths have been validated properly on insert
                    log::error!("Failed to load image with invalid path '{path}': {err}");
                    err
                })
                .ok()
        })
        .collect())
}

fn load_space(conn: &mut SqliteConnection, space: models::Space) -> Result<Space> {
    let models::Space {
        rowid,
        id,
        space_type,
        street,
        number,
        city,
        map_link,
        lat,
        lng,
        geohash,
        description,
        created_at,
        created_by_id,
        created_by_name,
    } = space;
    let space_type = SpaceType::from_i16(space_type)
        .ok_or_else(|| repo::Error::from(anyhow!("Invalid space type: {space_type}")))?;
    let geohash = geohash
        .parse::<Geohash>()
        .map_err(|err| repo::Error::from(anyhow!("Invalid geohash '{geohash}': {err}")))?;
    let map_link = map_link.and_then(|url| {
        url.parse::<Url>()
            .map_err(|err| {
                log::error!("Failed to load map link with invalid URL '{url}': {err}");
                err
            })
            .ok()
    });
    let images = load_space_images(conn, rowid)?;
    Ok(Space {
        id: id.into(),
        space_type,
        address: Address {
            street,
            number,
            city,
            map_link,
        },
        pos: MapPoint::try_from_lat_lng_deg(lat, lng).unwrap_or_default(),
        geohash,
        description,
        images,
        created: Activity {
            at: TimestampMs::from_millis(created_at),
            by: UserRef {
                id: created_by_id.into(),
                display_name: created_by_name,
            },
        },
    })
}

fn into_new_space(space: &Space) -> Result<models::NewSpace<'_>> {
    let Space {
        id,
        space_type,
        address,
        pos,
        geohash,
        description,
        images: _,
        created,
    } = space;
    debug_assert!(pos.is_valid());
    let space_type = space_type
        .to_i16()
        .ok_or_else(|| repo::Error::from(anyhow!("Invalid space type: {space_type}")))?;
    Ok(models::NewSpace {
        id: id.as_str(),
        space_type,
        street: &address.street,
        number: &address.number,
        city: &address.city,
        map_link: address.map_link.as_ref().map(Url::as_str),
        lat: pos.lat().to_deg(),
        lng: pos.lng().to_deg(),
        geohash: geohash.as_str(),
        description,
        created_at: created.at.as_millis(),
        created_by_id: created.by.id.as_str(),
        created_by_name: &created.by.display_name,
    })
}

fn insert_space_images(
    conn: &mut SqliteConnection,
    space_rowid: i64,
    images: &[ImageRef],
) -> Result<()> {
    let new_images: Vec<_> = images
        .iter()
        .enumerate()
        .map(|(position, image)| models::NewSpaceImage {
            parent_rowid: space_rowid,
            position: position as i32,
            path: image.as_str(),
        })
        .collect();
    if new_images.is_empty() {
        return Ok(());
    }
    let _count = diesel::insert_into(schema::space_image::table)
        .values(&new_images)
        .execute(conn)
        .map_err(from_diesel_err)?;
    debug_assert_eq!(new_images.len(), _count);
    Ok(())
}

fn delete_space_images(conn: &mut SqliteConnection, space_rowid: i64) -> Result<usize> {
    use schema::space_image::dsl;
    diesel::delete(schema::space_image::table.filter(dsl::parent_rowid.eq(space_rowid)))
        .execute(conn)
        .map_err(from_diesel_err)
}
