use sqlx::FromRow;

/// A running giveaway. `id` is the Discord message id of the announcement,
/// which doubles as the primary key in storage.
#[derive(Clone, Debug)]
pub struct Giveaway {
    pub id: i64,
    pub channel_id: i64,
    pub prize: i64,
    pub winners: i32,
    pub host_id: i64,
    pub image: Option<String>,
    pub ends_at: time::OffsetDateTime,
    pub participants: Vec<i64>,
}

#[derive(FromRow)]
pub struct DatabaseGiveaway {
    pub id: i64,
    pub channel_id: i64,
    pub prize: i64,
    pub winners: i32,
    pub host_id: i64,
    pub image: Option<String>,
    pub ends_at: time::OffsetDateTime,
}

impl DatabaseGiveaway {
    // Participants live in their own table, so the row alone is not a
    // complete giveaway.
    pub fn into_giveaway(self, participants: Vec<i64>) -> Giveaway {
        Giveaway {
            id: self.id,
            channel_id: self.channel_id,
            prize: self.prize,
            winners: self.winners,
            host_id: self.host_id,
            image: self.image,
            ends_at: self.ends_at,
            participants,
        }
    }
}

impl From<&Giveaway> for DatabaseGiveaway {
    fn from(value: &Giveaway) -> Self {
        DatabaseGiveaway {
            id: value.id,
            channel_id: value.channel_id,
            prize: value.prize,
            winners: value.winners,
            host_id: value.host_id,
            image: value.image.clone(),
            ends_at: value.ends_at,
        }
    }
}
