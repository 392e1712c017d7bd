//! Lua sandbox creation
//!
//! Manifests are plain data, so the sandbox only exposes the table, string
//! and math libraries. There is no I/O, no `os`, and no way to load other code.

use mlua::{Lua, LuaOptions, Result as LuaResult, StdLib, Table};

/// Create a restricted Lua sandbox for evaluating job manifests
///
/// The `job` helper module is always registered.
///
/// # Example
/// ```no_run
/// use placebench_jobspec::sandbox::create_sandbox;
///
/// let lua = create_sandbox()?;
/// let job: mlua::Table = lua.load(r#"return job.define { name = "bench" }"#).eval()?;
/// let name: String = job.get("name")?;
/// assert_eq!(name, "bench");
/// # Ok::<(), mlua::Error>(())
/// ```
pub fn create_sandbox() -> LuaResult<Lua> {
    let lua = Lua::new_with(
        StdLib::TABLE | StdLib::STRING | StdLib::MATH,
        LuaOptions::default(),
    )?;

    lua.globals().set("require", mlua::Nil)?;
    lua.globals().set("dofile", mlua::Nil)?;
    lua.globals().set("loadfile", mlua::Nil)?;
    lua.globals().set("load", mlua::Nil)?;

    register_job_module(&lua)?;

    Ok(lua)
}

/// Register the `job` helper module
///
/// `job.define`, `job.group` and `job.task` return their argument unchanged;
/// they exist so manifests read as declarations.
fn register_job_module(lua: &Lua) -> LuaResult<()> {
    let job = lua.create_table()?;

    for name in ["define", "group", "task"] {
        let passthrough = lua.create_function(|_, definition: Table| Ok(definition))?;
        job.set(name, passthrough)?;
    }

    lua.globals().set("job", job)?;

    Ok(())
}
