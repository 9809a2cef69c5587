//! Static driver and constructor profiles for the current season.
//!
//! These are bundled lookup tables, not fetched data; the season they cover is
//! [`PROFILE_SEASON`].

use serde::Serialize;

/// The season the bundled profile tables describe.
pub const PROFILE_SEASON: i32 = 2025;

/// Biographical profile of a current-season driver.
#[derive(Debug, Clone, Serialize)]
pub struct DriverProfile {
    pub name: &'static str,
    pub code: &'static str,
    pub number: u32,
    pub team: &'static str,
    pub nationality: &'static str,
    /// Date of birth, ISO format
    pub birth_date: &'static str,
    pub summary: &'static str,
}

impl DriverProfile {
    /// Multi-line human rendering, matching the driver-info card layout.
    pub fn describe(&self) -> String {
        format!(
            "{} ({}) {}\n{} #{}\n\n{}",
            self.name, self.birth_date, self.nationality, self.team, self.number, self.summary
        )
    }
}

/// Profile of a current-season constructor.
#[derive(Debug, Clone, Serialize)]
pub struct ConstructorProfile {
    pub name: &'static str,
    pub base: &'static str,
    pub team_principal: &'static str,
    pub drivers: [&'static str; 2],
    pub power_unit: &'static str,
    pub chassis: &'static str,
}

impl ConstructorProfile {
    /// Multi-line human rendering, matching the constructor-info card layout.
    pub fn describe(&self) -> String {
        format!(
            "{}\n{}\nTeam principal: {}\nDrivers: {} & {}\nPower unit: {}\nChassis: {}",
            self.name,
            self.base,
            self.team_principal,
            self.drivers[0],
            self.drivers[1],
            self.power_unit,
            self.chassis
        )
    }
}

/// The full current-season driver grid.
pub fn builtin_drivers() -> &'static [DriverProfile] {
    DRIVERS
}

/// The current-season constructors.
pub fn builtin_constructors() -> &'static [ConstructorProfile] {
    CONSTRUCTORS
}

static DRIVERS: &[DriverProfile] = &[
    DriverProfile {
        name: "Max Verstappen",
        code: "VER",
        number: 1,
        team: "Red Bull Racing",
        nationality: "Dutch",
        birth_date: "1997-09-30",
        summary: "Four-time world champion, with Red Bull since 2016 and the youngest Grand Prix winner in history.",
    },
    DriverProfile {
        name: "Yuki Tsunoda",
        code: "TSU",
        number: 22,
        team: "Red Bull Racing",
        nationality: "Japanese",
        birth_date: "2000-05-11",
        summary: "Promoted from the sister team in 2025 after four seasons; known for raw one-lap pace.",
    },
    DriverProfile {
        name: "Lando Norris",
        code: "NOR",
        number: 4,
        team: "McLaren",
        nationality: "British",
        birth_date: "1999-11-13",
        summary: "McLaren's lead driver and a consistent front-runner since the team's 2023 resurgence.",
    },
    DriverProfile {
        name: "Oscar Piastri",
        code: "PIA",
        number: 81,
        team: "McLaren",
        nationality: "Australian",
        birth_date: "2001-04-06",
        summary: "Reigning junior-series standout turned race winner in only his second season.",
    },
    DriverProfile {
        name: "Charles Leclerc",
        code: "LEC",
        number: 16,
        team: "Ferrari",
        nationality: "Monegasque",
        birth_date: "1997-10-16",
        summary: "Ferrari's long-term lead, famed for qualifying speed and a home win in Monaco in 2024.",
    },
    DriverProfile {
        name: "Lewis Hamilton",
        code: "HAM",
        number: 44,
        team: "Ferrari",
        nationality: "British",
        birth_date: "1985-01-07",
        summary: "Seven-time world champion; joined Ferrari in 2025 after twelve seasons with Mercedes.",
    },
    DriverProfile {
        name: "George Russell",
        code: "RUS",
        number: 63,
        team: "Mercedes",
        nationality: "British",
        birth_date: "1998-02-15",
        summary: "Mercedes team leader since Hamilton's departure; multiple Grand Prix winner.",
    },
    DriverProfile {
        name: "Andrea Kimi Antonelli",
        code: "ANT",
        number: 12,
        team: "Mercedes",
        nationality: "Italian",
        birth_date: "2006-08-25",
        summary: "Mercedes junior who jumped straight from Formula 2 to a race seat at eighteen.",
    },
    DriverProfile {
        name: "Fernando Alonso",
        code: "ALO",
        number: 14,
        team: "Aston Martin",
        nationality: "Spanish",
        birth_date: "1981-07-29",
        summary: "Two-time world champion and the most experienced driver on the grid.",
    },
    DriverProfile {
        name: "Lance Stroll",
        code: "STR",
        number: 18,
        team: "Aston Martin",
        nationality: "Canadian",
        birth_date: "1998-10-29",
        summary: "With Aston Martin since its rebrand; strong wet-weather qualifier.",
    },
    DriverProfile {
        name: "Pierre Gasly",
        code: "GAS",
        number: 10,
        team: "Alpine",
        nationality: "French",
        birth_date: "1996-02-07",
        summary: "Monza 2020 race winner, leading Alpine's rebuild.",
    },
    DriverProfile {
        name: "Franco Colapinto",
        code: "COL",
        number: 43,
        team: "Alpine",
        nationality: "Argentine",
        birth_date: "2003-05-27",
        summary: "Argentina's first F1 driver in over twenty years, signed by Alpine for 2025.",
    },
    DriverProfile {
        name: "Alexander Albon",
        code: "ALB",
        number: 23,
        team: "Williams",
        nationality: "Thai",
        birth_date: "1996-03-23",
        summary: "Williams' benchmark since 2022, regularly dragging the car into the points.",
    },
    DriverProfile {
        name: "Carlos Sainz",
        code: "SAI",
        number: 55,
        team: "Williams",
        nationality: "Spanish",
        birth_date: "1994-09-01",
        summary: "Multiple Grand Prix winner who moved to Williams when Ferrari signed Hamilton.",
    },
    DriverProfile {
        name: "Liam Lawson",
        code: "LAW",
        number: 30,
        team: "Racing Bulls",
        nationality: "New Zealander",
        birth_date: "2002-02-11",
        summary: "Red Bull junior racing full-time after two substitute stints.",
    },
    DriverProfile {
        name: "Isack Hadjar",
        code: "HAD",
        number: 6,
        team: "Racing Bulls",
        nationality: "French",
        birth_date: "2004-09-28",
        summary: "2024 Formula 2 runner-up in his rookie F1 season.",
    },
    DriverProfile {
        name: "Nico Hulkenberg",
        code: "HUL",
        number: 27,
        team: "Kick Sauber",
        nationality: "German",
        birth_date: "1987-08-19",
        summary: "Veteran of over 200 starts, anchoring Sauber ahead of the Audi takeover.",
    },
    DriverProfile {
        name: "Gabriel Bortoleto",
        code: "BOR",
        number: 5,
        team: "Kick Sauber",
        nationality: "Brazilian",
        birth_date: "2004-10-14",
        summary: "Reigning Formula 2 champion and Brazil's newest F1 driver.",
    },
    DriverProfile {
        name: "Esteban Ocon",
        code: "OCO",
        number: 31,
        team: "Haas",
        nationality: "French",
        birth_date: "1996-09-17",
        summary: "Hungary 2021 race winner, moved to Haas for 2025.",
    },
    DriverProfile {
        name: "Oliver Bearman",
        code: "BEA",
        number: 87,
        team: "Haas",
        nationality: "British",
        birth_date: "2005-05-08",
        summary: "Scored points on a surprise Ferrari debut in 2024 before his full-time Haas seat.",
    },
];

static CONSTRUCTORS: &[ConstructorProfile] = &[
    ConstructorProfile {
        name: "Red Bull Racing",
        base: "Milton Keynes, United Kingdom",
        team_principal: "Laurent Mekies",
        drivers: ["Max Verstappen", "Yuki Tsunoda"],
        power_unit: "Honda RBPT",
        chassis: "RB21",
    },
    ConstructorProfile {
        name: "McLaren",
        base: "Woking, United Kingdom",
        team_principal: "Andrea Stella",
        drivers: ["Lando Norris", "Oscar Piastri"],
        power_unit: "Mercedes",
        chassis: "MCL39",
    },
    ConstructorProfile {
        name: "Ferrari",
        base: "Maranello, Italy",
        team_principal: "Frederic Vasseur",
        drivers: ["Charles Leclerc", "Lewis Hamilton"],
        power_unit: "Ferrari",
        chassis: "SF-25",
    },
    ConstructorProfile {
        name: "Mercedes",
        base: "Brackley, United Kingdom",
        team_principal: "Toto Wolff",
        drivers: ["George Russell", "Andrea Kimi Antonelli"],
        power_unit: "Mercedes",
        chassis: "W16",
    },
    ConstructorProfile {
        name: "Aston Martin",
        base: "Silverstone, United Kingdom",
        team_principal: "Andy Cowell",
        drivers: ["Fernando Alonso", "Lance Stroll"],
        power_unit: "Mercedes",
        chassis: "AMR25",
    },
    ConstructorProfile {
        name: "Alpine",
        base: "Enstone, United Kingdom",
        team_principal: "Steve Nielsen",
        drivers: ["Pierre Gasly", "Franco Colapinto"],
        power_unit: "Renault",
        chassis: "A525",
    },
    ConstructorProfile {
        name: "Williams",
        base: "Grove, United Kingdom",
        team_principal: "James Vowles",
        drivers: ["Alexander Albon", "Carlos Sainz"],
        power_unit: "Mercedes",
        chassis: "FW47",
    },
    ConstructorProfile {
        name: "Racing Bulls",
        base: "Faenza, Italy",
        team_principal: "Alan Permane",
        drivers: ["Liam Lawson", "Isack Hadjar"],
        power_unit: "Honda RBPT",
        chassis: "VCARB 02",
    },
    ConstructorProfile {
        name: "Kick Sauber",
        base: "Hinwil, Switzerland",
        team_principal: "Jonathan Wheatley",
        drivers: ["Nico Hulkenberg", "Gabriel Bortoleto"],
        power_unit: "Ferrari",
        chassis: "C45",
    },
    ConstructorProfile {
        name: "Haas",
        base: "Kannapolis, United States",
        team_principal: "Ayao Komatsu",
        drivers: ["Esteban Ocon", "Oliver Bearman"],
        power_unit: "Ferrari",
        chassis: "VF-25",
    },
];
