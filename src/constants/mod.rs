pub mod game;

pub const TITLE_TEXT: &str = r#"
 ___ _
| __| |__ _ _ __ _ __ _  _
| _|| / _` | '_ \ '_ \ || |
|_| |_\__,_| .__/ .__/\_, |
 ___ _    |_|  |_|   |__/
| _ |_)_ _ __| |
| _ \ | '_/ _` |
|___/_|_| \__,_|
"#;
