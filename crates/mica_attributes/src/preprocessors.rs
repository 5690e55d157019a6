//! Built-in preprocessor grammars (spec.md §4.9.2), grounded directly in
//! `blinc_layout::css_parser`'s color/gradient/shadow parsers — the corpus
//! already demonstrates this exact shorthand grammar with `nom`.

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{map, opt, value};
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, tuple};
use nom::IResult;

use mica_core::{BorderRadius, Color, CornerValue};

use crate::value::{AttributeValue, Border, BoxShadow, Gradient, GradientAngle, TextShadow};

pub type PreprocessResult = Result<AttributeValue, String>;

fn require_str(value: &AttributeValue) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "expected a string value".to_string())
}

fn finish<'a, O>(result: IResult<&'a str, O>, raw: &str) -> Result<O, String> {
    match result {
        Ok((rest, out)) if rest.trim().is_empty() => Ok(out),
        Ok((rest, _)) => Err(format!("unexpected trailing input {rest:?} in {raw:?}")),
        Err(e) => Err(format!("failed to parse {raw:?}: {e}")),
    }
}

// ---------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------

fn hex_byte(input: &str) -> IResult<&str, u8> {
    let (rest, digits) = nom::bytes::complete::take(2usize)(input)?;
    let byte = u8::from_str_radix(digits, 16).map_err(|_| nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::HexDigit)))?;
    Ok((rest, byte))
}

fn hex_nibble(input: &str) -> IResult<&str, u8> {
    let (rest, digit) = nom::bytes::complete::take(1usize)(input)?;
    let v = u8::from_str_radix(digit, 16).map_err(|_| nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::HexDigit)))?;
    Ok((rest, v * 16 + v))
}

fn parse_hex_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = char('#')(input)?;
    let (input, hex) = take_while1(|c: char| c.is_ascii_hexdigit())(input)?;
    let color = match hex.len() {
        3 => {
            let (_, (r, g, b)) = tuple((hex_nibble, hex_nibble, hex_nibble))(hex)?;
            Color::rgb(r, g, b)
        }
        6 => {
            let (_, (r, g, b)) = tuple((hex_byte, hex_byte, hex_byte))(hex)?;
            Color::rgb(r, g, b)
        }
        8 => {
            let (_, (r, g, b, a)) = tuple((hex_byte, hex_byte, hex_byte, hex_byte))(hex)?;
            Color::argb(a, r, g, b)
        }
        _ => return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::LengthValue))),
    };
    Ok((input, color))
}

fn channel(input: &str) -> IResult<&str, u8> {
    let (input, value) = double(input)?;
    Ok((input, value.clamp(0.0, 255.0) as u8))
}

fn parse_rgb_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag_no_case("rgb")(input)?;
    let (input, (r, _, g, _, b)) = delimited(
        char('('),
        tuple((
            preceded(multispace0, channel),
            preceded(multispace0, char(',')),
            preceded(multispace0, channel),
            preceded(multispace0, char(',')),
            preceded(multispace0, channel),
        )),
        preceded(multispace0, char(')')),
    )(input)?;
    Ok((input, Color::rgb(r, g, b)))
}

fn parse_rgba_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag_no_case("rgba")(input)?;
    let (input, (r, _, g, _, b, _, a)) = delimited(
        char('('),
        tuple((
            preceded(multispace0, channel),
            preceded(multispace0, char(',')),
            preceded(multispace0, channel),
            preceded(multispace0, char(',')),
            preceded(multispace0, channel),
            preceded(multispace0, char(',')),
            preceded(multispace0, double),
        )),
        preceded(multispace0, char(')')),
    )(input)?;
    Ok((input, Color::argb((a.clamp(0.0, 1.0) * 255.0) as u8, r, g, b)))
}

fn parse_named_color(input: &str) -> IResult<&str, Color> {
    const NAMED: &[(&str, Color)] = &[
        ("transparent", Color::TRANSPARENT),
        ("black", Color::BLACK),
        ("white", Color::WHITE),
        ("red", Color::rgb(255, 0, 0)),
        ("green", Color::rgb(0, 128, 0)),
        ("blue", Color::rgb(0, 0, 255)),
        ("yellow", Color::rgb(255, 255, 0)),
        ("gray", Color::rgb(128, 128, 128)),
        ("grey", Color::rgb(128, 128, 128)),
    ];
    for (name, color) in NAMED {
        if let Ok((rest, _)) = tag_no_case::<_, _, nom::error::Error<&str>>(*name)(input) {
            return Ok((rest, *color));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Alt)))
}

pub fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((parse_hex_color, parse_rgba_color, parse_rgb_color, parse_named_color))(input.trim())
}

pub fn preprocess_color(value: &AttributeValue) -> PreprocessResult {
    let raw = require_str(value)?;
    let color = finish(parse_color(raw), raw)?;
    Ok(AttributeValue::Color(color))
}

// ---------------------------------------------------------------------
// border: "<width> [<style-ignored> <color>]"
// ---------------------------------------------------------------------

fn parse_border(input: &str) -> IResult<&str, Border> {
    let (input, width) = preceded(multispace0, double)(input)?;
    let (input, style_and_color) = opt(preceded(
        multispace1,
        tuple((opt(preceded(take_while1(|c: char| c.is_alphabetic()), multispace1)), parse_color)),
    ))(input)?;
    let color = style_and_color.map(|(_, color)| color);
    Ok((input, Border { width, color }))
}

pub fn preprocess_border(value: &AttributeValue) -> PreprocessResult {
    let raw = require_str(value)?;
    let border = finish(parse_border(raw), raw)?;
    Ok(AttributeValue::Border(border))
}

// ---------------------------------------------------------------------
// borderRadius: 1..4 scalar-or-percent components, CSS shorthand rules
// ---------------------------------------------------------------------

fn parse_corner_value(input: &str) -> IResult<&str, CornerValue> {
    let (input, magnitude) = double(input)?;
    let (input, percent) = opt(char('%'))(input)?;
    let value = if percent.is_some() { CornerValue::percent(magnitude) } else { CornerValue::absolute(magnitude) };
    Ok((input, value))
}

fn parse_corner_values(input: &str) -> IResult<&str, Vec<CornerValue>> {
    separated_list1(multispace1, parse_corner_value)(input.trim())
}

pub fn preprocess_border_radius(value: &AttributeValue) -> PreprocessResult {
    let raw = require_str(value)?;
    let components = finish(parse_corner_values(raw), raw)?;
    let radius = match components.as_slice() {
        [all] => BorderRadius::uniform(*all),
        [tl_br, tr_bl] => BorderRadius::new(*tl_br, *tr_bl, *tl_br, *tr_bl),
        [tl, tr_bl, br] => BorderRadius::new(*tl, *tr_bl, *br, *tr_bl),
        [tl, tr, br, bl] => BorderRadius::new(*tl, *tr, *br, *bl),
        _ => return Err(format!("borderRadius expects 1-4 components, got {}", components.len())),
    };
    Ok(AttributeValue::BorderRadius(radius))
}

// ---------------------------------------------------------------------
// background / textGradient: color | linear-gradient() | radial-gradient()
// ---------------------------------------------------------------------

fn parse_angle_degrees(input: &str) -> IResult<&str, f64> {
    let (input, degrees) = double(input)?;
    let (input, _) = tag_no_case("deg")(input)?;
    Ok((input, degrees))
}

fn parse_stop(input: &str) -> IResult<&str, (Color, Option<f64>)> {
    let (input, color) = parse_color(input.trim())?;
    let (input, location) = opt(preceded(multispace1, preceded(opt(char('@')), map(tuple((double, char('%'))), |(v, _)| v / 100.0))))(input)?;
    Ok((input, (color, location)))
}

fn parse_stops(input: &str) -> IResult<&str, Vec<(Color, Option<f64>)>> {
    separated_list1(preceded(multispace0, char(',')), preceded(multispace0, parse_stop))(input)
}

fn fill_locations(stops: Vec<(Color, Option<f64>)>) -> (Vec<Color>, Vec<f64>) {
    let count = stops.len().max(1);
    let colors = stops.iter().map(|(c, _)| *c).collect();
    let locations = stops
        .iter()
        .enumerate()
        .map(|(i, (_, loc))| loc.unwrap_or(i as f64 / (count - 1).max(1) as f64))
        .collect();
    (colors, locations)
}

fn parse_linear_gradient(input: &str) -> IResult<&str, Gradient> {
    let (input, _) = preceded(multispace0, tag_no_case("linear-gradient"))(input)?;
    let (input, body) = delimited(char('('), nom::bytes::complete::take_until(")"), char(')'))(input)?;
    let body = body.trim();
    let (rest_of_body, angle) = opt(tuple((parse_angle_degrees, preceded(multispace0, char(',')))))(body)
        .map(|(rest, maybe)| (rest, maybe.map(|(deg, _)| deg)))
        .unwrap_or((body, None));
    let (_, stops) = finish_stops(rest_of_body)?;
    let (colors, locations) = fill_locations(stops);
    Ok((
        input,
        Gradient {
            colors,
            locations,
            angle: GradientAngle::snap_degrees(angle.unwrap_or(180.0)),
            radial: false,
        },
    ))
}

fn finish_stops(input: &str) -> IResult<&str, Vec<(Color, Option<f64>)>> {
    parse_stops(input.trim_start_matches(','))
}

fn parse_radial_gradient(input: &str) -> IResult<&str, Gradient> {
    let (input, _) = preceded(multispace0, tag_no_case("radial-gradient"))(input)?;
    let (input, body) = delimited(char('('), nom::bytes::complete::take_until(")"), char(')'))(input)?;
    let (_, stops) = finish_stops(body.trim())?;
    let (colors, locations) = fill_locations(stops);
    Ok((
        input,
        Gradient {
            colors,
            locations,
            angle: GradientAngle::Bottom,
            radial: true,
        },
    ))
}

fn parse_gradient_or_color(input: &str) -> IResult<&str, Gradient> {
    alt((parse_linear_gradient, parse_radial_gradient, map(parse_color, Gradient::solid)))(input)
}

pub fn preprocess_background(value: &AttributeValue) -> PreprocessResult {
    let raw = require_str(value)?;
    let gradient = finish(parse_gradient_or_color(raw), raw)?;
    Ok(AttributeValue::Gradient(gradient))
}

// ---------------------------------------------------------------------
// boxShadow: "complex? <h> <v> <blur> <color>"
// ---------------------------------------------------------------------

fn parse_box_shadow(input: &str) -> IResult<&str, BoxShadow> {
    let (input, inset) = opt(tuple((tag_no_case("inset"), multispace1)))(input.trim())?;
    let (input, (h, _, v, _, blur, _, color)) =
        tuple((double, multispace1, double, multispace1, double, multispace1, parse_color))(input)?;
    Ok((
        input,
        BoxShadow {
            inset: inset.is_some(),
            h,
            v,
            blur,
            color,
        },
    ))
}

pub fn preprocess_box_shadow(value: &AttributeValue) -> PreprocessResult {
    let raw = require_str(value)?;
    let shadow = finish(parse_box_shadow(raw), raw)?;
    Ok(AttributeValue::BoxShadow(shadow))
}

// ---------------------------------------------------------------------
// textShadow: "<color> <radius> <opacity> <h> <v>"
// ---------------------------------------------------------------------

fn parse_text_shadow(input: &str) -> IResult<&str, TextShadow> {
    let (input, (color, _, radius, _, opacity, _, h, _, v)) = tuple((
        parse_color,
        multispace1,
        double,
        multispace1,
        double,
        multispace1,
        double,
        multispace1,
        double,
    ))(input.trim())?;
    Ok((input, TextShadow { color, radius, opacity, h, v }))
}

pub fn preprocess_text_shadow(value: &AttributeValue) -> PreprocessResult {
    let raw = require_str(value)?;
    let shadow = finish(parse_text_shadow(raw), raw)?;
    Ok(AttributeValue::TextShadow(shadow))
}

// ---------------------------------------------------------------------
// Postprocessors (RTL-aware, spec.md §4.9.2)
// ---------------------------------------------------------------------

pub fn postprocess_box_shadow_rtl(value: AttributeValue) -> AttributeValue {
    match value {
        AttributeValue::BoxShadow(shadow) => AttributeValue::BoxShadow(shadow.mirrored()),
        other => other,
    }
}

pub fn postprocess_gradient_rtl(value: AttributeValue) -> AttributeValue {
    match value {
        AttributeValue::Gradient(mut gradient) => {
            gradient.angle = gradient.angle.mirrored();
            AttributeValue::Gradient(gradient)
        }
        other => other,
    }
}

pub fn postprocess_border_radius_rtl(value: AttributeValue) -> AttributeValue {
    match value {
        AttributeValue::BorderRadius(radius) => AttributeValue::BorderRadius(radius.mirrored()),
        other => other,
    }
}
