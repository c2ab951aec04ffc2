//! Example: Lua scripts driving named key-value collections
//!
//! This example demonstrates the script surface end to end: constructing
//! handles, the optional database index, error flattening, and the
//! constructor failure triple once the pool is closed.

use luakv::store::ConnectionPool;
use luakv::{LuaExecutor, ScriptOptions, SessionState};

fn main() -> Result<(), luakv::Error> {
    env_logger::init();

    let pool = ConnectionPool::in_memory();
    let session = SessionState::new(pool.clone(), 0);
    let executor = LuaExecutor::new(session, ScriptOptions::default());

    println!("=== Lua Key-Value Binding Example ===\n");

    // Example 1: basic usage
    println!("Example 1: Round trip");
    println!("-----------------------------------");

    let script = r#"
        local kv = KeyValue("greetings")
        kv:set("en", "hello")
        kv:set("no", "hei")
        return kv:get("en") .. " / " .. kv:get("no")
    "#;

    match executor.execute_with_result(script) {
        Ok(result) => println!("Script result: {:?}", result),
        Err(e) => println!("Script failed: {}", e),
    }

    // Example 2: explicit database index
    println!("\nExample 2: Explicit database index");
    println!("-----------------------------------");

    let script = r#"
        -- Same collection name, different logical partitions
        KeyValue("greetings", 3):set("en", "howdy")
        return KeyValue("greetings"):get("en") .. " / " .. KeyValue("greetings", 3):get("en")
    "#;

    match executor.execute_with_result(script) {
        Ok(result) => println!("Script result: {:?}", result),
        Err(e) => println!("Script failed: {}", e),
    }

    // Example 3: flattened errors after the pool is gone
    println!("\nExample 3: Construction failure triple");
    println!("-----------------------------------");

    pool.close();

    let script = r#"
        local kv, msg, code = KeyValue("greetings")
        if kv == nil then
            return "constructor failed: " .. msg .. " (code " .. code .. ")"
        end
        return "unexpectedly succeeded"
    "#;

    match executor.execute_with_result(script) {
        Ok(result) => println!("Script result: {:?}", result),
        Err(e) => println!("Script failed: {}", e),
    }

    Ok(())
}
