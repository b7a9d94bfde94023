//! Tests for coordinate conversion and index stepping

use super::*;

#[test]
fn test_new_york_city_at_zoom_16() {
    // New York City: 40.7128°N, 74.0060°W
    let tile = to_tile(40.7128, -74.0060, 16, 256).unwrap();
    assert_eq!(tile.x, 19295);
    assert_eq!(tile.y, 24640);
    assert_eq!(tile.x_offset, 158);
    assert_eq!(tile.y_offset, 71);
    assert_eq!(tile.zoom, 16);
}

#[test]
fn test_london_at_zoom_10() {
    let tile = to_tile(51.5074, -0.1278, 10, 256).unwrap();
    assert_eq!((tile.x, tile.y), (511, 340));
    assert_eq!((tile.x_offset, tile.y_offset), (162, 129));
}

#[test]
fn test_sydney_at_zoom_8() {
    let tile = to_tile(-33.9461, 151.1772, 8, 256).unwrap();
    assert_eq!((tile.x, tile.y), (235, 153));
    assert_eq!((tile.x_offset, tile.y_offset), (128, 176));
}

#[test]
fn test_equator_prime_meridian() {
    // At zoom 1: 2×2 tiles, 0°N 0°E is the top-left corner of (1, 1)
    let tile = to_tile(0.0, 0.0, 1, 256).unwrap();
    assert_eq!((tile.x, tile.y), (1, 1));
    assert_eq!((tile.x_offset, tile.y_offset), (0, 0));
}

#[test]
fn test_offsets_scale_with_tile_size() {
    let small = to_tile(51.5074, -0.1278, 10, 256).unwrap();
    let large = to_tile(51.5074, -0.1278, 10, 512).unwrap();
    assert_eq!((small.x, small.y), (large.x, large.y));
    assert!(large.x_offset / 2 == small.x_offset || large.x_offset / 2 + 1 == small.x_offset);
}

#[test]
fn test_antimeridian_longitude_wraps_to_column_zero() {
    let tile = to_tile(0.0, 180.0, 4, 256).unwrap();
    assert_eq!(tile.x, 0);
    assert_eq!(tile.y, 8);
}

#[test]
fn test_longitude_outside_range_is_normalized() {
    let wrapped = to_tile(10.0, 190.0, 6, 256).unwrap();
    let direct = to_tile(10.0, -170.0, 6, 256).unwrap();
    assert_eq!(wrapped, direct);
}

#[test]
fn test_latitude_beyond_mercator_limit_is_clamped() {
    let north = to_tile(89.0, 0.0, 3, 256).unwrap();
    assert_eq!(north.y, 0);
    assert_eq!(north.y_offset, 0);

    let south = to_tile(-89.0, 0.0, 3, 256).unwrap();
    assert_eq!(south.y, 7);
    assert_eq!(south.y_offset, 255);
}

#[test]
fn test_invalid_latitude() {
    assert!(matches!(
        to_tile(90.5, 0.0, 10, 256),
        Err(CoordError::InvalidLatitude(_))
    ));
    assert!(matches!(
        to_tile(f64::NAN, 0.0, 10, 256),
        Err(CoordError::InvalidLatitude(_))
    ));
}

#[test]
fn test_invalid_longitude() {
    assert!(matches!(
        to_tile(0.0, f64::INFINITY, 10, 256),
        Err(CoordError::InvalidLongitude(_))
    ));
}

#[test]
fn test_invalid_zoom() {
    assert!(matches!(
        to_tile(0.0, 0.0, MAX_ZOOM + 1, 256),
        Err(CoordError::InvalidZoom(_))
    ));
}

#[test]
fn test_tile_to_lat_lon_northwest_corner() {
    let (lat, lon) = tile_to_lat_lon(19295, 24640, 16);
    assert!((lat - 40.713).abs() < 0.01);
    assert!((lon - (-74.007)).abs() < 0.01);
}

#[test]
fn test_tile_to_lat_lon_map_edges() {
    let (north, west) = tile_to_lat_lon(0, 0, 5);
    let (south, east) = tile_to_lat_lon(32, 32, 5);
    assert!((north - MAX_LAT).abs() < 1e-6);
    assert!((south - MIN_LAT).abs() < 1e-6);
    assert_eq!(west, -180.0);
    assert_eq!(east, 180.0);
}

#[test]
fn test_roundtrip_at_different_zooms() {
    let lat = 51.5074;
    let lon = -0.1278;

    for zoom in [0, 5, 10, 15, 18] {
        let tile = to_tile(lat, lon, zoom, 256).unwrap();
        let (corner_lat, corner_lon) = tile_to_lat_lon(tile.x, tile.y, zoom);
        let tile_degrees = 360.0 / 2.0_f64.powi(zoom as i32);

        assert!(corner_lat >= lat, "corner is north of the point");
        assert!(corner_lon <= lon, "corner is west of the point");
        assert!((corner_lat - lat).abs() < tile_degrees);
        assert!((corner_lon - lon).abs() < tile_degrees);
    }
}

#[test]
fn test_increment_x_wraps_at_tile_count() {
    assert_eq!(increment_x(3, 2), 0);
    assert_eq!(increment_x(2, 2), 3);
    assert_eq!(increment_x(0, 0), 0);
}

#[test]
fn test_decrement_x_wraps_below_zero() {
    assert_eq!(decrement_x(0, 4), 15);
    assert_eq!(decrement_x(7, 4), 6);
}

#[test]
fn test_increment_y_stops_at_bottom_row() {
    assert_eq!(increment_y(14, 4), Some(15));
    assert_eq!(increment_y(15, 4), None);
}

#[test]
fn test_decrement_y_stops_at_top_row() {
    assert_eq!(decrement_y(1), Some(0));
    assert_eq!(decrement_y(0), None);
}

#[test]
fn test_parse_decimal_degrees() {
    assert_eq!(parse_coordinate("51.4775", "-0.4614"), Ok((51.4775, -0.4614)));
    assert_eq!(parse_coordinate(" 12.5 ", "+3"), Ok((12.5, 3.0)));
}

#[test]
fn test_parse_hemisphere_letters() {
    assert_eq!(parse_coordinate("33.9461S", "151.1772E"), Ok((-33.9461, 151.1772)));
    assert_eq!(parse_coordinate("n51.5", "W0.5"), Ok((51.5, -0.5)));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(matches!(
        parse_coordinate("abc", "0"),
        Err(CoordError::Unparseable(_))
    ));
    assert!(matches!(
        parse_coordinate("10", "-5W"),
        Err(CoordError::Unparseable(_))
    ));
    assert!(matches!(
        parse_coordinate("NaN", "0"),
        Err(CoordError::Unparseable(_))
    ));
}

#[test]
fn test_error_display() {
    assert!(CoordError::InvalidZoom(25).to_string().contains("25"));
    assert!(CoordError::Unparseable("x".into()).to_string().contains("'x'"));
}
