/// Room type stored when a hotel booking does not name one
pub const DEFAULT_ROOM_TYPE: &str = "Standard";

/// Guest count stored when a hotel booking does not give one
pub const DEFAULT_BOOKING_GUESTS: i32 = 1;

/// Guest count assumed by hotel search when none is given
pub const DEFAULT_SEARCH_GUESTS: i32 = 1;

/// Cost factor for bcrypt password hashes
pub const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;
