/// Which field of an environment (DHT) payload a channel reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvField {
    TemperatureC,
    HumidityPct,
}

impl EnvField {
    pub fn key(&self) -> &'static str {
        match self {
            EnvField::TemperatureC => "temperature_c",
            EnvField::HumidityPct => "humidity_pct",
        }
    }
}

/// Which count of a headcount (classification) payload a channel reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    Total,
    Class(&'static str),
}

/// Physical sensor family; determines the raw payload contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Binary detector nodes (flame, smoke, sound):
    /// `{ value, detect, ts, ... }`. `detect` maps to a critical/ok status.
    Detector,
    /// Environmental analog sensor (DHT): `{ temperature_c, humidity_pct, ts }`.
    Environment(EnvField),
    /// Motion/vibration sensor (gyro): `{ magnitude, is_shaking, ts }`.
    /// `is_shaking` maps to a warn/ok status.
    Vibration,
    /// Personnel classification counts: `{ total, classes: {...}, ts }`.
    Headcount(CountField),
}

impl ChannelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelKind::Detector => "detector",
            ChannelKind::Environment(_) => "environment",
            ChannelKind::Vibration => "vibration",
            ChannelKind::Headcount(_) => "headcount",
        }
    }
}

/// One logical sensor channel: a measurement stream with a fixed identity.
///
/// Several channels may be fed by the same source document (the DHT payload
/// carries both temperature and humidity; the classification payload carries
/// every class count).
#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    /// Channel id, also the dashboard-facing path.
    pub id: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    /// Path of the raw source document this channel reads from.
    pub source: &'static str,
    pub kind: ChannelKind,
}

static CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        id: "raspi/node/flame",
        name: "Flame detector",
        unit: "level",
        source: "raspi/node/flame",
        kind: ChannelKind::Detector,
    },
    ChannelSpec {
        id: "raspi/node/smoke",
        name: "Smoke detector",
        unit: "ppm",
        source: "raspi/node/smoke",
        kind: ChannelKind::Detector,
    },
    ChannelSpec {
        id: "raspi/node/sound",
        name: "Sound level",
        unit: "dB",
        source: "raspi/node/sound",
        kind: ChannelKind::Detector,
    },
    ChannelSpec {
        id: "raspi/sensors/dht/temp",
        name: "Temperature",
        unit: "°C",
        source: "raspi/sensors/dht",
        kind: ChannelKind::Environment(EnvField::TemperatureC),
    },
    ChannelSpec {
        id: "raspi/sensors/dht/humid",
        name: "Humidity",
        unit: "%",
        source: "raspi/sensors/dht",
        kind: ChannelKind::Environment(EnvField::HumidityPct),
    },
    ChannelSpec {
        id: "raspi/sensors/gyro",
        name: "Vibration",
        unit: "deg/s",
        source: "raspi/sensors/gyro",
        kind: ChannelKind::Vibration,
    },
    ChannelSpec {
        id: "raspi/ppe/total",
        name: "Detections total",
        unit: "count",
        source: "raspi/ppe",
        kind: ChannelKind::Headcount(CountField::Total),
    },
    ChannelSpec {
        id: "raspi/ppe/hat",
        name: "Hard hats",
        unit: "count",
        source: "raspi/ppe",
        kind: ChannelKind::Headcount(CountField::Class("hat")),
    },
    ChannelSpec {
        id: "raspi/ppe/person",
        name: "Personnel",
        unit: "count",
        source: "raspi/ppe",
        kind: ChannelKind::Headcount(CountField::Class("person")),
    },
];

/// All registered channels.
pub fn registry() -> &'static [ChannelSpec] {
    CHANNELS
}

/// Look up a channel by id. Unknown ids yield `None`: no subscription is
/// created and the channel silently produces no data.
pub fn channel(id: &str) -> Option<&'static ChannelSpec> {
    CHANNELS.iter().find(|c| c.id == id)
}

/// Every channel fed by a raw source path.
pub fn channels_for_source(source: &str) -> impl Iterator<Item = &'static ChannelSpec> + '_ {
    CHANNELS.iter().filter(move |c| c.source == source)
}
