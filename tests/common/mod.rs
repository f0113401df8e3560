//! Shared scene schema for the integration tests.

#![allow(dead_code)]

use paramtree::{
    param_enum, param_group, Collection, CountedCollection, CountedSequence, Group, Limited,
    LimitedProperty, Param, ParamTree, PlainProperty, Sequence,
};

param_enum! {
    pub enum Mode {
        #[default]
        Fast = "fast",
        Accurate = "accurate",
    }
}

param_group! {
    /// Two-field element used by the sequence and collection scenarios.
    pub struct Pixel {
        pub name: Param<String> = ("Name".to_string()),
        pub value: Param<i32> = (0),
    }
}

param_group! {
    pub struct Render {
        pub width: Limited<u32> = (640, 1, 8192),
        pub gamma: Limited<f64> = (2.2, 0.1, 5.0),
        pub mode: Param<Mode> = (Mode::Fast),
        pub tags: Param<Vec<String>> = (Vec::new()),
        pub exposure: LimitedProperty<f64> = (1.0, 0.0, 10.0, "Exposure multiplier"),
        pub label: PlainProperty<String> = ("main".to_string(), "Display label"),
    }
}

param_group! {
    pub struct Scene {
        pub render: Group<Render>,
        pub entry: Group<Pixel>,
        pub pixels: Sequence<Pixel>,
        pub samples: CountedSequence<i32>,
        pub layers: Collection<String, Pixel>,
        pub weights: CountedCollection<String, f64>,
        pub verbose: Param<bool> = (false),
    }
}

pub fn scene() -> ParamTree<Scene> {
    ParamTree::new("scene")
}

/// A tree with every node kind moved off its default.
pub fn populated_scene() -> ParamTree<Scene> {
    let mut tree = scene();
    tree.render.width.set(1920);
    tree.render.gamma.set(1.8);
    tree.render.mode.set(Mode::Accurate);
    tree.render.tags.set(vec!["hdr".to_string(), "preview".to_string()]);
    tree.render.exposure.set(2.5);
    tree.render.label.set("side".to_string());
    tree.entry.value.set(9);

    tree.pixels.resize(3);
    tree.pixels[0].value.set(5);
    tree.pixels[2].name.set("last".to_string());

    tree.samples.push(4);
    tree.samples.push(-2);

    tree.layers.get_or_insert("new".to_string()).value.set(3);
    tree.layers.get_or_insert("old".to_string());

    tree.weights.insert("a".to_string(), 0.25);
    tree.weights.insert("b".to_string(), 1.5);

    tree.verbose.set(true);
    tree
}

/// Strings that are easy to mangle: padded, blank, multi-line, or shaped
/// like numbers and booleans. Grows `pixels` to three items if needed.
pub fn set_awkward_strings(tree: &mut ParamTree<Scene>) {
    tree.entry.name.set("  padded  ".to_string());
    tree.render.label.set("   ".to_string());

    if tree.pixels.len() < 3 {
        tree.pixels.resize(3);
    }
    tree.pixels[0].name.set("line one\nline two".to_string());
    tree.pixels[1].name.set("007".to_string());
    tree.pixels[2].name.set("fish & chips <3".to_string());

    tree.layers.get_or_insert("  spaced key  ".to_string()).name.set("1e5".to_string());
    tree.weights.insert("true".to_string(), 2.0);
}
