//! Validates command-line argument parsing and defaults

use clap::Parser;
use stereogrammer::algorithm::Algorithm;
use stereogrammer::io::cli::{Cli, DotStyle};

#[test]
fn test_defaults_match_the_documented_configuration() {
    let cli = Cli::parse_from(["stereogrammer", "depth.png"]);

    assert_eq!(cli.width, 1024);
    assert_eq!(cli.height, 768);
    assert!((cli.separation - 128.0).abs() < f64::EPSILON);
    assert!((cli.field_depth - 0.3333).abs() < f64::EPSILON);
    assert_eq!(cli.oversample, 2);
    assert_eq!(cli.algorithm, Algorithm::Horoptic);
    assert_eq!(cli.dots, DotStyle::Grey);
    assert!(!cli.remove_hidden);
    assert!(!cli.convergence_dots);
    assert!(!cli.stretch);
    assert!(!cli.invert);
    assert!(cli.should_show_progress());
}

#[test]
fn test_flags_and_values_parse() {
    let cli = Cli::parse_from([
        "stereogrammer",
        "scene.png",
        "--texture",
        "tile.png",
        "--oversample",
        "4",
        "--separation",
        "96",
        "--algorithm",
        "tyler-chang",
        "--remove-hidden",
        "--convergence-dots",
        "--invert",
        "--gamma",
        "0.8",
        "--quiet",
    ]);

    assert_eq!(cli.texture.as_deref(), Some(std::path::Path::new("tile.png")));
    assert_eq!(cli.oversample, 4);
    assert!((cli.separation - 96.0).abs() < f64::EPSILON);
    assert_eq!(cli.algorithm, Algorithm::TylerChang);
    assert!(cli.remove_hidden);
    assert!(cli.convergence_dots);
    assert!(cli.invert);
    assert_eq!(cli.gamma, Some(0.8));
    assert!(!cli.should_show_progress());
}

#[test]
fn test_colour_dot_style_parses() {
    let cli = Cli::parse_from(["stereogrammer", "depth.png", "--dots", "colour"]);
    assert_eq!(cli.dots, DotStyle::Colour);
}
