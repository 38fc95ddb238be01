use std::env;

use tui_maze::adapter::ServerConfig;

const VARS: [&str; 3] = ["MAZE_AI_HOST", "MAZE_AI_PORT", "MAZE_AI_DISABLED"];

fn clear() {
    for var in VARS {
        env::remove_var(var);
    }
}

// One test function: the variables are process-wide.
#[test]
fn adapter_config_reads_environment() {
    clear();
    assert_eq!(ServerConfig::from_env(), ServerConfig::default());
    assert!(!ServerConfig::is_disabled());

    env::set_var("MAZE_AI_HOST", " 0.0.0.0 ");
    env::set_var("MAZE_AI_PORT", "9191");
    let config = ServerConfig::from_env();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9191);

    // Unusable values fall back to the defaults.
    env::set_var("MAZE_AI_HOST", "   ");
    env::set_var("MAZE_AI_PORT", "70000");
    assert_eq!(ServerConfig::from_env(), ServerConfig::default());
    env::set_var("MAZE_AI_PORT", "ai");
    assert_eq!(ServerConfig::from_env().port, 8081);

    for (value, disabled) in [("1", true), ("true", true), ("TRUE", true), ("0", false), ("no", false), ("", false)] {
        env::set_var("MAZE_AI_DISABLED", value);
        assert_eq!(ServerConfig::is_disabled(), disabled, "MAZE_AI_DISABLED={:?}", value);
    }

    clear();
}
