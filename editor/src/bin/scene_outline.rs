//! Builds the default scene and prints its tree view and edition panel
//!
//! Usage: `scene_outline [settings.json]`

use scene_editor::settings::EditorSettings;
use scene_editor::EditorState;

fn main() {
    let settings = match std::env::args().nth(1) {
        Some(path) => EditorSettings::load_or_default(path),
        None => EditorSettings::load_or_default(EditorSettings::default_path()),
    };

    // Initialize logging
    scene_engine::init_logging_with_filter(&settings.log_filter);

    let mut editor = match EditorState::new(settings) {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to create editor: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = editor.load_default_scene() {
        eprintln!("Failed to build default scene: {}", e);
        std::process::exit(1);
    }

    println!("=== Scene Graph ===\n");
    let tree = editor.graph().tree();
    for entry in tree.iter() {
        let icon = entry.icon.map(|icon| icon.css_class()).unwrap_or("-");
        println!(
            "{}{} [{}] ({})",
            "  ".repeat(tree.depth(&entry.id)),
            entry.text,
            icon,
            entry.id
        );
    }

    println!("\n=== Textures ===\n");
    for &texture in editor.scene().textures() {
        if let Ok(texture) = editor.scene().texture(texture) {
            println!("{}", texture.serialize());
        }
    }

    println!("\n=== Edition Panel ===\n");
    let nodes = editor.scene().all_nodes();
    for node in nodes {
        if let Err(e) = editor.select_entity(node) {
            eprintln!("Failed to select {:?}: {}", node, e);
            continue;
        }
        let name = editor.scene().name_of(node).unwrap_or_default();
        println!("{}: {}", name, editor.edition().visible_tabs().join(", "));
        if let Some(form) = editor.edition().active_form() {
            for field in form.fields() {
                println!("    {} = {:?}", field.label, field.value);
            }
        }
    }
}
