// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::lighting::color::Color;
use crate::lighting::scene::Fixture;

/// One strand with a single-pixel fixture at each x position.
fn line_scene(xs: &[f64]) -> (Scene, BufferLayout) {
    let fixtures = xs
        .iter()
        .enumerate()
        .map(|(i, &x)| Fixture::new(0, i as u16, 1, [x, 0.0], [x, 0.0]))
        .collect();
    let scene = Scene::new(fixtures).unwrap();
    let layout = BufferLayout::new(&scene);
    (scene, layout)
}

fn filled(layout: &BufferLayout, color: Color) -> FrameBuffer {
    let mut buffer = layout.buffer();
    for pixel in 0..layout.shape().1 {
        buffer.set_color((0, pixel), color);
    }
    buffer
}

fn row(buffer: &FrameBuffer) -> Vec<Color> {
    (0..buffer.shape().1).map(|p| buffer.color((0, p))).collect()
}

fn wipe_for(scene: &Scene, layout: &BufferLayout, mode: WipeMode) -> Wipe {
    let mut wipe = Wipe::new(mode);
    wipe.setup(scene, layout, &mut StdRng::seed_from_u64(7));
    wipe
}

#[test]
fn test_wipe_halfway() {
    let (scene, layout) = line_scene(&[0.0, 10.0]);
    let mut wipe = wipe_for(&scene, &layout, WipeMode::Horizontal);

    let start = filled(&layout, Color::WHITE);
    let end = filled(&layout, Color::BLACK);
    let blended = wipe.get(start, end, 0.5).unwrap();

    // x=0 is behind the edge at x=5 and shows the incoming frame.
    assert!(wipe.is_masked((0, 0)));
    assert!(!wipe.is_masked((0, 1)));
    assert_eq!(row(&blended), vec![Color::BLACK, Color::WHITE]);
}

#[test]
fn test_wipe_extents() {
    let (scene, layout) = line_scene(&[2.0, 10.0, 6.0]);
    let wipe = wipe_for(&scene, &layout, WipeMode::Horizontal);
    assert_eq!(wipe.extents(), Some((2.0, 8.0, 0.0, 0.0)));

    let [dx, dy] = wipe.direction().unwrap();
    assert!(((dx * dx + dy * dy) - 1.0).abs() < 1e-9);
}

#[test]
fn test_wipe_boundaries() {
    let (scene, layout) = line_scene(&[0.0, 5.0, 10.0]);
    let red = Color::new(255, 0, 0);
    let blue = Color::new(0, 0, 255);

    let mut wipe = wipe_for(&scene, &layout, WipeMode::Horizontal);
    let blended = wipe
        .get(filled(&layout, red), filled(&layout, blue), 0.0)
        .unwrap();
    assert_eq!(row(&blended), vec![red, red, red]);

    // The edge stops at max_x, and the comparison is strict.
    let blended = wipe
        .get(filled(&layout, red), filled(&layout, blue), 1.0)
        .unwrap();
    assert_eq!(row(&blended), vec![blue, blue, red]);
}

#[test]
fn test_wipe_mask_accumulates() {
    let (scene, layout) = line_scene(&[0.0, 5.0, 10.0]);
    let red = Color::new(255, 0, 0);
    let blue = Color::new(0, 0, 255);
    let mut wipe = wipe_for(&scene, &layout, WipeMode::Horizontal);

    let mut previous = vec![false; 3];
    for progress in [0.0, 0.3, 0.6, 0.9] {
        wipe.get(filled(&layout, red), filled(&layout, blue), progress)
            .unwrap();
        let mask: Vec<bool> = (0..3).map(|p| wipe.is_masked((0, p))).collect();
        assert!(previous.iter().zip(&mask).all(|(old, new)| !old || *new));
        previous = mask;
    }

    // Going backwards keeps everything wiped so far.
    let blended = wipe
        .get(filled(&layout, red), filled(&layout, blue), 0.1)
        .unwrap();
    assert_eq!(row(&blended), vec![blue, blue, red]);

    // A new activation starts from a clean mask.
    wipe.setup(&scene, &layout, &mut StdRng::seed_from_u64(8));
    let blended = wipe
        .get(filled(&layout, red), filled(&layout, blue), 0.1)
        .unwrap();
    assert_eq!(row(&blended), vec![blue, red, red]);
}

#[test]
fn test_wipe_pixels_of_a_long_fixture() {
    // One fixture of five pixels from x=0 to x=4, plus a short second strand.
    let scene = Scene::new(vec![
        Fixture::new(0, 0, 5, [0.0, 0.0], [4.0, 0.0]),
        Fixture::new(1, 0, 1, [4.0, 1.0], [4.0, 1.0]),
    ])
    .unwrap();
    let layout = BufferLayout::new(&scene);
    let mut wipe = wipe_for(&scene, &layout, WipeMode::Horizontal);

    // Midpoints are at x=2 and x=4, so the threshold at 0.5 is x=3.
    let start = layout.buffer();
    let end = layout.buffer();
    wipe.get(start, end, 0.5).unwrap();

    let wiped: Vec<bool> = (0..5).map(|p| wipe.is_masked((0, p))).collect();
    assert_eq!(wiped, vec![true, true, true, false, false]);
    assert!(!wipe.is_masked((1, 0)));
}

#[test]
fn test_angled_wipe_runs_from_nothing_to_nearly_everything() {
    let (scene, layout) = line_scene(&[0.0, 3.0, 7.0, 10.0]);
    let red = Color::new(255, 0, 0);
    let blue = Color::new(0, 0, 255);

    let mut wipe = wipe_for(&scene, &layout, WipeMode::Angled);
    let blended = wipe
        .get(filled(&layout, red), filled(&layout, blue), 0.0)
        .unwrap();
    assert!(row(&blended).iter().all(|c| *c == red));

    let blended = wipe
        .get(filled(&layout, red), filled(&layout, blue), 1.0)
        .unwrap();
    // At most the pixel furthest along the sweep direction is left.
    let remaining = row(&blended).iter().filter(|c| **c == red).count();
    assert!(remaining <= 1);
}

#[test]
fn test_wipe_requires_setup() {
    let (_, layout) = line_scene(&[0.0, 1.0]);
    let mut wipe = Wipe::new(WipeMode::Horizontal);
    assert_eq!(
        wipe.get(layout.buffer(), layout.buffer(), 0.5),
        Err(TransitionError::NotReady("Wipe".to_string()))
    );
}

#[test]
fn test_shape_mismatch() {
    let (scene, layout) = line_scene(&[0.0, 1.0]);
    let mut wipe = wipe_for(&scene, &layout, WipeMode::Horizontal);
    assert_eq!(
        wipe.get(layout.buffer(), FrameBuffer::new(2, 2), 0.5),
        Err(TransitionError::ShapeMismatch {
            expected: (1, 2),
            actual: (2, 2)
        })
    );

    let mut fade = Fade::new();
    fade.setup(&scene, &layout, &mut StdRng::seed_from_u64(0));
    assert!(fade
        .get(FrameBuffer::new(1, 3), layout.buffer(), 0.5)
        .is_err());
}

#[test]
fn test_fade() {
    let (scene, layout) = line_scene(&[0.0, 1.0]);
    let mut fade = Fade::new();
    fade.setup(&scene, &layout, &mut StdRng::seed_from_u64(0));

    let start = filled(&layout, Color::new(200, 0, 100));
    let end = filled(&layout, Color::new(0, 100, 200));
    let blended = fade.get(start.clone(), end.clone(), 0.5).unwrap();
    assert_eq!(row(&blended), vec![Color::new(100, 50, 150); 2]);

    assert_eq!(fade.get(start.clone(), end.clone(), 0.0).unwrap(), start);
    assert_eq!(fade.get(start, end.clone(), 1.0).unwrap(), end);
}

#[test]
fn test_cut_and_kinds() {
    let (scene, layout) = line_scene(&[0.0, 1.0]);
    let mut cut = TransitionKind::Cut.build(WipeMode::Horizontal);
    assert_eq!(cut.name(), "Cut");
    cut.setup(&scene, &layout, &mut StdRng::seed_from_u64(0));
    let end = filled(&layout, Color::WHITE);
    assert_eq!(cut.get(layout.buffer(), end.clone(), 0.0).unwrap(), end);

    assert_eq!(
        TransitionKind::Wipe.build(WipeMode::Angled).name(),
        "Wipe"
    );
    assert_eq!(TransitionKind::Fade.build(WipeMode::Horizontal).name(), "Fade");
}

#[test]
fn test_fade_blends_whole_colors() {
    let (scene, layout) = line_scene(&[0.0, 1.0]);
    let mut fade = Fade::new();
    fade.setup(&scene, &layout, &mut StdRng::seed_from_u64(0));

    let start = filled(&layout, Color::new(255, 0, 15));
    let end = filled(&layout, Color::BLACK);
    let blended = fade.get(start, end, 0.3).unwrap();

    // 255 * 0.7 = 178.5 and 15 * 0.7 = 10.5, both truncated to whole channel values.
    assert_eq!(blended.get((0, 0)), [178.0, 0.0, 10.0]);
    assert_eq!(row(&blended), vec![Color::new(178, 0, 10); 2]);
}
