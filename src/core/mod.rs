pub mod date;
pub mod scale;
pub mod types;

pub use date::{
    DATE_FORMAT, SECONDS_PER_DAY, SECONDS_PER_HALF_DAY, date_to_epoch_seconds,
    epoch_seconds_to_date, format_date, parse_date,
};
pub use scale::{Axis, FixedDensity, LinearScale, PixelDensity, Viewport};
pub use types::{
    BloodSample, MAX_DURATION_DAYS, MeasurementCell, MeasurementKind, MedicationEvent,
    parse_duration_days,
};
