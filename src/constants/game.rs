// All positions and sizes are in design units: the world is WORLD_WIDTH x WORLD_HEIGHT,
// origin at the top-left corner, y grows downwards.

pub const WORLD_WIDTH: i32 = 576;
pub const WORLD_HEIGHT: i32 = 1024;

pub const BIRD_INITIAL_X: i32 = 230;
pub const BIRD_INITIAL_Y: f32 = 350.0;
pub const BIRD_WIDTH: i32 = 68;
pub const BIRD_HEIGHT: i32 = 48;

pub const JUMP_VELOCITY: f32 = -10.5;
pub const GRAVITY: f32 = 3.0;
pub const DISPLACEMENT_LIMIT: f32 = 10.0;
pub const RISE_BOOST: f32 = 2.0;

pub const MAX_ROTATION: f32 = 25.0;
pub const MIN_ROTATION: f32 = -90.0;
pub const DIVE_FLOOR: f32 = -60.0;
pub const DIVE_POSE_TILT: f32 = -80.0;
pub const ROTATION_VELOCITY: f32 = 20.0;
pub const TILT_HOLD_MARGIN: f32 = 50.0;

pub const ANIMATION_TIME: u32 = 5;

pub const CEILING_Y: f32 = 0.0;
pub const FLOOR_Y: f32 = 750.0;

pub const PIPE_WIDTH: i32 = 104;
pub const PIPE_HEIGHT: i32 = 640;
pub const PIPE_GAP: i32 = 200;
pub const PIPE_VELOCITY: i32 = 5;
pub const PIPE_INITIAL_X: i32 = 700;
pub const PIPE_SPAWN_X: i32 = 650;
pub const PIPE_GAP_MIN: i32 = 50;
pub const PIPE_GAP_MAX: i32 = 450;
pub const PIPE_RIM_HEIGHT: i32 = 48;
pub const PIPE_INSET: i32 = 8;

pub const BASE_Y: i32 = 800;
pub const BASE_WIDTH: i32 = 672;
pub const BASE_HEIGHT: i32 = 224;
pub const BASE_VELOCITY: i32 = 4;

pub const BIRD_SCALE: usize = 4;
pub const TILE_SCALE: usize = 8;

// Sprite texels. `.` is transparent, every other character is opaque and picks a palette entry.
pub const BIRD_TEXTS: [&str; 3] = [
    // wings down
    r#"
......kkkkkk.....
....kkyyyykwwk...
...kyyyyykwwwwk..
..kyyyyyykwwwkwk.
.kyyyyyyykwwwkwk.
kyyyyyyyyykwwwwk.
kyykkkkkyyykkkkkk
kykwwwwwkyykooooo
.kwwwwwwkykoookkk
..kwwwwk.kkoooook
...kkkk..kkyykkk.
.........kkkk....
"#,
    // wings level
    r#"
......kkkkkk.....
....kkyyyykwwk...
...kyyyyykwwwwk..
.kkkkyyyykwwwkwk.
kwwwwkyyykwwwkwk.
kwwwwwkyyykwwwwk.
kywwwykyyyykkkkkk
.kkkkkyyyykoooooo
..kyyyyyykoookkk.
..kyyyyyyykoooook
...kkyyyyyykkkkk.
.....kkkkkk......
"#,
    // wings up
    r#"
......kkkkkk.....
..kkkkyyyykwwk...
.kwwwwkyykwwwwk..
kwwwwwwkykwwwkwk.
kwwwwwwkykwwwkwk.
kywwwwykyykwwwwk.
.kyyyykyyyykkkkkk
..kkkkyyyykoooooo
..kyyyyyykoookkk.
..kyyyyyyykoooook
...kkyyyyyykkkkk.
.....kkkkkk......
"#,
];

// Palette entries, resolved against the `styles` section of the configuration.
pub const PALETTE: [(char, &str); 8] = [
    ('y', "bird"),
    ('w', "bird_light"),
    ('k', "outline"),
    ('o', "beak"),
    ('g', "pipe"),
    ('G', "pipe_rim"),
    ('d', "ground"),
    ('D', "grass"),
];
