pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{comment_builder::*, space_builder::*};

fn anonymous() -> crate::user::UserRef {
    crate::user::UserRef {
        id: "anonymous".into(),
        display_name: "Anonymous".into(),
    }
}

pub mod space_builder {

    use super::*;
    use crate::{activity::*, address::*, geo::*, geohash::*, space::*, time::*, user::*};

    #[derive(Debug)]
    pub struct SpaceBuild {
        space: Space,
    }

    impl SpaceBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.space.id = id.into();
            self
        }
        pub fn space_type(mut self, space_type: SpaceType) -> Self {
            self.space.space_type = space_type;
            self
        }
        pub fn address(mut self, street: &str, number: &str, city: &str) -> Self {
            self.space.address = Address {
                street: street.into(),
                number: number.into(),
                city: city.into(),
                map_link: None,
            };
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.space.pos = pos;
            self.space.geohash = Geohash::encode(pos, DEFAULT_PRECISION);
            self
        }
        pub fn description(mut self, desc: &str) -> Self {
            self.space.description = desc.into();
            self
        }
        pub fn image(mut self, file_name: &str) -> Self {
            let image = ImageRef::new(&self.space.id, file_name).unwrap();
            self.space.images.push(image);
            self
        }
        pub fn created_at(mut self, at: TimestampMs) -> Self {
            self.space.created.at = at;
            self
        }
        pub fn created_by(mut self, by: &UserRef) -> Self {
            self.space.created.by = by.clone();
            self
        }
        pub fn finish(self) -> Space {
            self.space
        }
    }

    impl Builder for Space {
        type Build = SpaceBuild;
        fn build() -> SpaceBuild {
            let pos = MapPoint::from_lat_lng_deg(0.0, 0.0);
            SpaceBuild {
                space: Space {
                    id: crate::id::Id::new(),
                    space_type: SpaceType::default(),
                    address: Address::default(),
                    pos,
                    geohash: Geohash::encode(pos, DEFAULT_PRECISION),
                    description: "".into(),
                    images: vec![],
                    created: Activity::now(anonymous()),
                },
            }
        }
    }
}

pub mod comment_builder {

    use super::*;
    use crate::{activity::*, comment::*, id::*, time::*, user::*};

    #[derive(Debug)]
    pub struct CommentBuild {
        comment: Comment,
    }

    impl CommentBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.comment.id = id.into();
            self
        }
        pub fn space_id(mut self, space_id: &str) -> Self {
            self.comment.space_id = space_id.into();
            self
        }
        pub fn text(mut self, text: &str) -> Self {
            self.comment.text = text.into();
            self
        }
        pub fn created_at(mut self, at: TimestampMs) -> Self {
            self.comment.created.at = at;
            self
        }
        pub fn created_by(mut self, by: &UserRef) -> Self {
            self.comment.created.by = by.clone();
            self
        }
        pub fn finish(self) -> Comment {
            self.comment
        }
    }

    impl Builder for Comment {
        type Build = CommentBuild;
        fn build() -> CommentBuild {
            CommentBuild {
                comment: Comment {
                    id: Id::new(),
                    space_id: Id::new(),
                    text: "".into(),
                    created: Activity::now(anonymous()),
                },
            }
        }
    }
}
