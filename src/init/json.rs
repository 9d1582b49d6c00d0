//! Scenario files: throw/target positions plus optional board, bounds and
//! search overrides, in JSON. Everything but the throw position falls back
//! to the regulation-board defaults.

use std::{fs::File, io::Read};

use json::JsonValue;

use crate::error::{Error, Result};
use crate::geometry::{self, BoardGeometry, Vec3};
use crate::optimizer::{SearchBounds, SearchSettings};

/// One fully resolved optimization request.
pub struct Scenario {
    pub throw_position: Vec3,
    pub target_position: Vec3,
    pub num_solutions: usize,
    pub board: BoardGeometry,
    pub bounds: SearchBounds,
    pub settings: SearchSettings,
}

macro_rules! override_f64 {
    ($target:ident, $json:ident, $key:literal, $setter:ident) => {
        if !$json[$key].is_null() {
            let value = $json[$key]
                .as_f64()
                .ok_or_else(|| Error::Scenario(concat!($key, " must be a number").to_owned()))?;
            $target = $target.$setter(value);
        }
    };
}

pub fn from_file(file_path: &str) -> Result<Scenario> {
    parse_from_string(&read_file(file_path)?)
}

pub fn parse_from_string(content: &str) -> Result<Scenario> {
    let root = json::parse(content).map_err(|e| Error::Scenario(format!("Json error: {e}")))?;

    let board = parse_board(&root["Board"])?;

    let throw_position = if root["Throw"].is_null() {
        Vec3::new(0., geometry::defaults::RELEASE_HEIGHT, 0.)
    } else {
        parse_vec3(&root["Throw"], "Throw")?
    };

    let target_position = if !root["Target"].is_null() {
        parse_vec3(&root["Target"], "Target")?
    } else {
        let distance = optional_f64(&root, "ThrowDistance", geometry::defaults::THROW_DISTANCE)?;
        board.hole_center(distance)
    };

    let num_solutions = if root["Solutions"].is_null() {
        1
    } else {
        root["Solutions"]
            .as_usize()
            .ok_or_else(|| Error::Scenario("Solutions must be a count".to_owned()))?
    };

    Ok(Scenario {
        throw_position,
        target_position,
        num_solutions,
        board,
        bounds: parse_bounds(&root["Bounds"])?,
        settings: parse_settings(&root["Search"])?,
    })
}

fn read_file(file_path: &str) -> Result<String> {
    let mut content = String::new();
    let mut file = File::open(file_path)
        .map_err(|e| Error::Scenario(format!("Error while opening file {file_path}: {e}")))?;
    file.read_to_string(&mut content)
        .map_err(|e| Error::Scenario(format!("Failed to read file: {e}")))?;
    Ok(content)
}

fn parse_vec3(value: &JsonValue, context: &str) -> Result<Vec3> {
    let component = |key: &str| {
        value[key]
            .as_f64()
            .ok_or_else(|| Error::Scenario(format!("Couldn't find {context}/{key}")))
    };
    Ok(Vec3::new(component("X")?, component("Y")?, component("Z")?))
}

fn optional_f64(value: &JsonValue, key: &str, default: f64) -> Result<f64> {
    let field = &value[key];
    if field.is_null() {
        Ok(default)
    } else {
        field
            .as_f64()
            .ok_or_else(|| Error::Scenario(format!("{key} must be a number")))
    }
}

fn parse_board(value: &JsonValue) -> Result<BoardGeometry> {
    let mut board = BoardGeometry::default();
    if value.is_null() {
        return Ok(board);
    }
    override_f64!(board, value, "Length", with_length);
    override_f64!(board, value, "Width", with_width);
    override_f64!(board, value, "BackHeight", with_back_height);
    override_f64!(board, value, "HoleDiameter", with_hole_diameter);
    override_f64!(board, value, "HoleFromTopEdge", with_hole_from_top_edge);
    override_f64!(board, value, "Gravity", with_gravity);
    Ok(board)
}

fn parse_bounds(value: &JsonValue) -> Result<SearchBounds> {
    let mut bounds = SearchBounds::default();
    if value.is_null() {
        return Ok(bounds);
    }
    if let Some((min, max)) = pair(value, "Velocity")? {
        bounds = bounds.with_velocity(min, max);
    }
    if let Some((min, max)) = pair(value, "Pitch")? {
        bounds = bounds.with_pitch(min, max);
    }
    if let Some((min, max)) = pair(value, "Yaw")? {
        bounds = bounds.with_yaw(min, max);
    }
    bounds.validate()?;
    Ok(bounds)
}

fn pair(value: &JsonValue, key: &str) -> Result<Option<(f64, f64)>> {
    let field = &value[key];
    if field.is_null() {
        return Ok(None);
    }
    match (field[0].as_f64(), field[1].as_f64()) {
        (Some(min), Some(max)) => Ok(Some((min, max))),
        _ => Err(Error::Scenario(format!("{key} must be a [min, max] pair"))),
    }
}

fn parse_settings(value: &JsonValue) -> Result<SearchSettings> {
    let mut settings = SearchSettings::default();
    if value.is_null() {
        return Ok(settings);
    }
    if !value["PopulationSize"].is_null() {
        let size = value["PopulationSize"]
            .as_usize()
            .ok_or_else(|| Error::Scenario("PopulationSize must be a count".to_owned()))?;
        settings = settings.with_population_size(size);
    }
    if !value["MaxGenerations"].is_null() {
        let generations = value["MaxGenerations"]
            .as_usize()
            .ok_or_else(|| Error::Scenario("MaxGenerations must be a count".to_owned()))?;
        settings = settings.with_max_generations(generations);
    }
    if !value["Seed"].is_null() {
        let seed = value["Seed"]
            .as_u64()
            .ok_or_else(|| Error::Scenario("Seed must be an integer".to_owned()))?;
        settings = settings.with_seed(seed);
    }
    override_f64!(settings, value, "DistanceTolerance", with_distance_tolerance);
    Ok(settings)
}

#[cfg(test)]
mod json_tests {
    use super::*;

    const FULL_SCENARIO: &str = r#"{
        "Throw": { "X": 0, "Y": 5.5, "Z": 1.5 },
        "ThrowDistance": 27,
        "Solutions": 3,
        "Board": { "Length": 4, "BackHeight": 1, "HoleDiameter": 0.5 },
        "Bounds": { "Velocity": [18, 35], "Pitch": [20, 50], "Yaw": [-10, 10] },
        "Search": { "PopulationSize": 40, "MaxGenerations": 80, "Seed": 7 }
    }"#;

    #[test]
    fn full_scenario() {
        let scenario = parse_from_string(FULL_SCENARIO).unwrap();
        assert_eq!(scenario.throw_position, Vec3::new(0., 5.5, 1.5));
        assert_eq!(scenario.num_solutions, 3);
        assert_eq!(scenario.bounds.velocity, (18., 35.));
        assert_eq!(scenario.bounds.pitch, (20., 50.));
        assert_eq!(scenario.settings.population_size, 40);
        assert_eq!(scenario.settings.max_generations, 80);
        assert_eq!(scenario.settings.seed, 7);
        // Target derived from the board geometry at 27 feet.
        assert!((scenario.target_position.x - 30.25).abs() < 1e-9);
        assert!((scenario.target_position.y - 0.8125).abs() < 1e-9);
    }

    #[test]
    fn minimal_scenario_uses_defaults() {
        let scenario = parse_from_string("{}").unwrap();
        assert_eq!(
            scenario.throw_position,
            Vec3::new(0., geometry::defaults::RELEASE_HEIGHT, 0.)
        );
        assert_eq!(scenario.num_solutions, 1);
        assert_eq!(scenario.bounds.velocity, (15., 40.));
        assert!((scenario.target_position.x - 30.25).abs() < 1e-9);
    }

    #[test]
    fn explicit_target_wins() {
        let scenario =
            parse_from_string(r#"{ "Target": { "X": 20, "Y": 1, "Z": 0 } }"#).unwrap();
        assert_eq!(scenario.target_position, Vec3::new(20., 1., 0.));
    }

    #[test]
    fn malformed_bounds_rejected() {
        let result = parse_from_string(r#"{ "Bounds": { "Velocity": [40, 15] } }"#);
        assert!(matches!(result, Err(Error::MalformedRange { .. })));
    }

    #[test]
    fn missing_component_reported() {
        let result = parse_from_string(r#"{ "Throw": { "X": 0, "Y": 5.5 } }"#);
        assert!(matches!(result, Err(Error::Scenario(message)) if message.contains("Throw/Z")));
    }

    #[test]
    fn not_json() {
        assert!(matches!(
            parse_from_string("not json"),
            Err(Error::Scenario(_))
        ));
    }
}
