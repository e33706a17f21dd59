/// WGSL shader for textured scene quads.
///
/// Vertices arrive already in NDC. `alpha` scales the sampled alpha and a
/// non-zero `hover` brightens the texel.
pub const QUAD_SHADER: &str = r#"
struct QuadVertex {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) alpha: f32,
    @location(3) hover: f32,
};

struct QuadOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) alpha: f32,
    @location(2) hover: f32,
};

@group(0) @binding(0)
var quad_texture: texture_2d<f32>;
@group(0) @binding(1)
var quad_sampler: sampler;

@vertex
fn vs_quad(vertex: QuadVertex) -> QuadOutput {
    var out: QuadOutput;
    out.clip_position = vec4<f32>(vertex.position, 0.0, 1.0);
    out.uv = vertex.uv;
    out.alpha = vertex.alpha;
    out.hover = vertex.hover;
    return out;
}

@fragment
fn fs_quad(in: QuadOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(quad_texture, quad_sampler, in.uv);
    let brighten = mix(1.0, 1.15, step(0.5, in.hover));
    let rgb = min(texel.rgb * brighten, vec3<f32>(1.0));
    return vec4<f32>(rgb, texel.a * in.alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_shader_validates() {
        let module = naga::front::wgsl::parse_str(QUAD_SHADER).expect("WGSL parses");
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        validator.validate(&module).expect("WGSL validates");
    }

    #[test]
    fn quad_shader_exposes_entry_points() {
        let module = naga::front::wgsl::parse_str(QUAD_SHADER).expect("WGSL parses");
        let names: Vec<&str> = module
            .entry_points
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert!(names.contains(&"vs_quad"));
        assert!(names.contains(&"fs_quad"));
    }
}
