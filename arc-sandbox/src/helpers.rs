/// Python helper functions injected into the `analyze_grid` tool's sandbox
///: `find_connected_components`, `detect_symmetry`,
/// `get_bounding_box`, `color_counts`. Plain-text source, not compiled on
/// the Rust side — it is prepended to the user's script before the harness
/// wraps it.
pub const GRID_ANALYSIS_HELPERS: &str = r#"
import numpy as np
from scipy import ndimage

def find_connected_components(grid, background=0):
    arr = np.array(grid)
    mask = arr != background
    labeled, count = ndimage.label(mask)
    components = []
    for i in range(1, count + 1):
        ys, xs = np.where(labeled == i)
        components.append({
            "cells": list(zip(ys.tolist(), xs.tolist())),
            "color": int(arr[ys[0], xs[0]]),
        })
    return components

def detect_symmetry(grid):
    arr = np.array(grid)
    return {
        "horizontal": bool(np.array_equal(arr, np.flip(arr, axis=0))),
        "vertical": bool(np.array_equal(arr, np.flip(arr, axis=1))),
        "rotational_180": bool(np.array_equal(arr, np.rot90(arr, 2))),
    }

def get_bounding_box(grid, background=0):
    arr = np.array(grid)
    ys, xs = np.where(arr != background)
    if len(ys) == 0:
        return None
    return {"min_row": int(ys.min()), "max_row": int(ys.max()), "min_col": int(xs.min()), "max_col": int(xs.max())}

def color_counts(grid):
    arr = np.array(grid)
    values, counts = np.unique(arr, return_counts=True)
    return {int(v): int(c) for v, c in zip(values, counts)}
"#;
