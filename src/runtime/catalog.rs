//! The fixed table of runtime routine bodies. Bodies are kept as
//! hand-written assembly text rather than built from [`crate::asm`]
//! instructions — runtime library code is dense, registerallocation-free
//! leaf code that reads better written out directly than reassembled
//! from an instruction enum, the same call the reference codebase makes
//! for its own prelude.
//!
//! Real arithmetic here works on a deliberately reduced mantissa: each
//! 5-byte MBF value's top 16 mantissa bits (with the implied leading
//! bit forced back in) are used as the whole working value, and the
//! bottom two bytes are always zero on anything this catalog produces.
//! That trades MBF's native ~9 significant decimal digits for about
//! 4-5, in exchange for every routine fitting in native 16-bit Z80
//! register arithmetic instead of a hand-rolled 32-bit-wide library.
//! See DESIGN.md for the full writeup.

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy)]
pub struct Routine {
    pub name: &'static str,
    pub body: &'static str,
    pub deps: &'static [&'static str],
}

macro_rules! routines {
    ($($name:expr => { deps: $deps:expr, body: $body:expr $(,)? }),* $(,)?) => {
        pub static CATALOG: Lazy<HashMap<&'static str, Routine>> = Lazy::new(|| {
            let mut map = HashMap::new();
            $(
                map.insert($name, Routine { name: $name, deps: $deps, body: $body });
            )*
            map
        });
    };
}

routines! {
    "strlib_alloc_temp" => {
        deps: &[],
        body: "\
strlib_alloc_temp:\n\
\t; rotates through the fixed temp-string pool; returns a buffer in HL.\n\
\t; strpool_cursor already holds an absolute pointer into strpool, so\n\
\t; each call just advances it by one slot and wraps at the pool's end\n\
\tld\thl,(strpool_cursor)\n\
\tpush\thl\n\
\tld\tde,256\n\
\tadd\thl,de\n\
\tld\tde,strpool+2048\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tjr\tc,strlib_alloc_temp_wrapped\n\
\tadd\thl,de\n\
\tjr\tstrlib_alloc_temp_store\n\
strlib_alloc_temp_wrapped:\n\
\tadd\thl,de\n\
strlib_alloc_temp_store:\n\
\tld\t(strpool_cursor),hl\n\
\tpop\thl\n\
\tret",
    },
    "real_alloc_temp" => {
        deps: &[],
        body: "\
real_alloc_temp:\n\
\t; rotates through the fixed temp-real pool, same scheme as\n\
\t; strlib_alloc_temp but over 5-byte slots\n\
\tld\thl,(realpool_cursor)\n\
\tpush\thl\n\
\tld\tde,5\n\
\tadd\thl,de\n\
\tld\tde,realpool+40\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tjr\tc,real_alloc_temp_wrapped\n\
\tadd\thl,de\n\
\tjr\treal_alloc_temp_store\n\
real_alloc_temp_wrapped:\n\
\tadd\thl,de\n\
real_alloc_temp_store:\n\
\tld\t(realpool_cursor),hl\n\
\tpop\thl\n\
\tret",
    },
    "strlib_concat" => {
        deps: &["strlib_alloc_temp"],
        body: "\
strlib_concat:\n\
\t; hl = lhs buffer, de = rhs buffer; returns concatenation in hl\n\
\tld\t(strlib_src_a),hl\n\
\tld\t(strlib_src_b),de\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\
\tld\ta,(de)\n\
\tadd\ta,b\n\
\tld\tc,a\n\t; combined length; wraps mod 256 like the buffer itself\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(strlib_dst),hl\n\
\tld\ta,c\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\tde,(strlib_src_a)\n\
\tld\ta,(de)\n\
\tor\ta\n\
\tjr\tz,strlib_concat_rhs\n\
\tld\tb,a\n\
\tinc\tde\n\
strlib_concat_lhs_loop:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdjnz\tstrlib_concat_lhs_loop\n\
strlib_concat_rhs:\n\
\tld\tde,(strlib_src_b)\n\
\tld\ta,(de)\n\
\tor\ta\n\
\tjr\tz,strlib_concat_done\n\
\tld\tb,a\n\
\tinc\tde\n\
strlib_concat_rhs_loop:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdjnz\tstrlib_concat_rhs_loop\n\
strlib_concat_done:\n\
\tld\thl,(strlib_dst)\n\
\tret",
    },
    "strlib_len" => {
        deps: &[],
        body: "\
strlib_len:\n\
\t; hl = string buffer; returns length in hl\n\
\tld\ta,(hl)\n\
\tld\tl,a\n\
\tld\th,0\n\
\tret",
    },
    "strlib_asc" => {
        deps: &[],
        body: "\
strlib_asc:\n\
\t; hl = string buffer; returns first byte's code in hl, 0 for an empty string\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\tl,a\n\
\tld\th,0\n\
\tret",
    },
    "strlib_chr" => {
        deps: &["strlib_alloc_temp"],
        body: "\
strlib_chr:\n\
\t; hl = character code; returns a one-character buffer in hl\n\
\tld\ta,l\n\
\tld\t(strlib_chr_val),a\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(hl),1\n\
\tinc\thl\n\
\tld\ta,(strlib_chr_val)\n\
\tld\t(hl),a\n\
\tdec\thl\n\
\tret",
    },
    "strlib_left" => {
        deps: &["strlib_alloc_temp"],
        body: "\
strlib_left:\n\
\t; hl = string buffer, de = count; returns the leftmost substring in hl\n\
\tld\t(strlib_src_a),hl\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\t; actual length\n\
\tld\ta,e\n\
\tcp\tb\n\
\tjr\tc,strlib_left_count_ok\n\
\tld\ta,b\n\
strlib_left_count_ok:\n\
\tld\tc,a\n\t; clamped count\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(strlib_dst),hl\n\
\tld\ta,c\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\tde,(strlib_src_a)\n\
\tinc\tde\n\
\tld\ta,c\n\
\tor\ta\n\
\tjr\tz,strlib_left_done\n\
\tld\tb,a\n\
strlib_left_loop:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdjnz\tstrlib_left_loop\n\
strlib_left_done:\n\
\tld\thl,(strlib_dst)\n\
\tret",
    },
    "strlib_mid" => {
        deps: &["strlib_alloc_temp"],
        body: "\
strlib_mid:\n\
\t; entry: stack holds (top to bottom) the return address, start, and\n\
\t; the s buffer address pushed by the caller; hl = count.\n\
\t; MID$(s, start, count), 1-based start, both clamped to the source\n\
\t; string's actual length; the callee (this routine) is responsible\n\
\t; for popping its caller's pushed arguments\n\
\tpop\tde\n\
\tld\t(strlib_mid_ret),de\n\
\tpop\tde\n\t; de = start (1-based)\n\
\tex\t(sp),hl\n\t; hl = s buffer address, top of stack becomes the saved count\n\
\tld\t(strlib_src_a),hl\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\t; b = source length\n\
\tld\ta,e\n\
\tor\ta\n\
\tjr\tnz,strlib_mid_start_nz\n\
\tld\ta,1\n\
strlib_mid_start_nz:\n\
\tcp\tb\n\
\tjr\tc,strlib_mid_start_ok\n\
\tld\ta,b\n\
\tinc\ta\n\
strlib_mid_start_ok:\n\
\tdec\ta\n\t; a = number of characters to skip before the slice\n\
\tld\t(strlib_mid_skip),a\n\
\tld\tc,a\n\
\tld\ta,b\n\
\tsub\tc\n\t; a = characters remaining from start to the end of the string\n\
\tld\tb,a\n\
\tpop\thl\n\t; hl = count argument\n\
\tld\ta,l\n\
\tcp\tb\n\
\tjr\tc,strlib_mid_count_ok\n\
\tld\ta,b\n\
strlib_mid_count_ok:\n\
\tld\tc,a\n\t; c = clamped count\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(strlib_dst),hl\n\
\tld\ta,c\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\tde,(strlib_src_a)\n\
\tinc\tde\n\
\tld\ta,(strlib_mid_skip)\n\
\tor\ta\n\
\tjr\tz,strlib_mid_copy\n\
\tld\tb,a\n\
strlib_mid_skip_loop:\n\
\tinc\tde\n\
\tdjnz\tstrlib_mid_skip_loop\n\
strlib_mid_copy:\n\
\tld\ta,c\n\
\tor\ta\n\
\tjr\tz,strlib_mid_done\n\
\tld\tb,a\n\
strlib_mid_copy_loop:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdjnz\tstrlib_mid_copy_loop\n\
strlib_mid_done:\n\
\tld\thl,(strlib_dst)\n\
\tld\tde,(strlib_mid_ret)\n\
\tpush\tde\n\
\tret",
    },
    "strlib_right" => {
        deps: &["strlib_alloc_temp"],
        body: "\
strlib_right:\n\
\t; hl = string buffer, de = count; returns the rightmost substring in hl\n\
\tld\t(strlib_src_a),hl\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\
\tld\ta,e\n\
\tcp\tb\n\
\tjr\tc,strlib_right_count_ok\n\
\tld\ta,b\n\
strlib_right_count_ok:\n\
\tld\tc,a\n\t; clamped count\n\
\tld\ta,b\n\
\tsub\tc\n\
\tld\tb,a\n\t; skip offset = length - count\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(strlib_dst),hl\n\
\tld\ta,c\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\tde,(strlib_src_a)\n\
\tinc\tde\n\
\tld\ta,b\n\
\tor\ta\n\
\tjr\tz,strlib_right_copy\n\
strlib_right_skip_loop:\n\
\tinc\tde\n\
\tdec\ta\n\
\tjr\tnz,strlib_right_skip_loop\n\
strlib_right_copy:\n\
\tld\ta,c\n\
\tor\ta\n\
\tjr\tz,strlib_right_done\n\
\tld\tb,a\n\
strlib_right_loop:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdjnz\tstrlib_right_loop\n\
strlib_right_done:\n\
\tld\thl,(strlib_dst)\n\
\tret",
    },
    "strlib_int2str" => {
        deps: &["strlib_alloc_temp", "div16_hlby10"],
        body: "\
strlib_int2str:\n\
\t; hl = signed 16-bit value; returns its decimal rendering in hl\n\
\txor\ta\n\
\tld\t(strlib_int2str_neg),a\n\
\tld\ta,h\n\
\tor\ta\n\
\tjp\tp,strlib_int2str_start\n\
\tld\ta,1\n\
\tld\t(strlib_int2str_neg),a\n\
\tld\ta,h\n\
\tcpl\n\
\tld\th,a\n\
\tld\ta,l\n\
\tcpl\n\
\tld\tl,a\n\
\tinc\thl\n\
strlib_int2str_start:\n\
\tld\tde,strlib_int2str_buf+6\n\
\tld\t(strlib_int2str_ptr),de\n\
\tld\ta,h\n\
\tor\tl\n\
\tjr\tnz,strlib_int2str_loop\n\
\tld\ta,'0'\n\
\tld\t(de),a\n\
\tdec\tde\n\
\tld\t(strlib_int2str_ptr),de\n\
\tjr\tstrlib_int2str_sign\n\
strlib_int2str_loop:\n\
\tld\ta,h\n\
\tor\tl\n\
\tjr\tz,strlib_int2str_sign\n\
\tcall\tdiv16_hlby10\n\
\tadd\ta,'0'\n\
\tex\tde,hl\n\
\tld\thl,(strlib_int2str_ptr)\n\
\tld\t(hl),a\n\
\tdec\thl\n\
\tld\t(strlib_int2str_ptr),hl\n\
\tex\tde,hl\n\
\tjr\tstrlib_int2str_loop\n\
strlib_int2str_sign:\n\
\tld\ta,(strlib_int2str_neg)\n\
\tor\ta\n\
\tjr\tz,strlib_int2str_copy\n\
\tld\tde,(strlib_int2str_ptr)\n\
\tld\ta,'-'\n\
\tld\t(de),a\n\
\tdec\tde\n\
\tld\t(strlib_int2str_ptr),de\n\
strlib_int2str_copy:\n\
\tld\thl,strlib_int2str_buf+6\n\
\tld\tde,(strlib_int2str_ptr)\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tld\tc,l\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(strlib_dst),hl\n\
\tld\ta,c\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\tde,(strlib_int2str_ptr)\n\
\tinc\tde\n\
\tld\ta,c\n\
\tor\ta\n\
\tjr\tz,strlib_int2str_done\n\
\tld\tb,a\n\
strlib_int2str_copy_loop:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdjnz\tstrlib_int2str_copy_loop\n\
strlib_int2str_done:\n\
\tld\thl,(strlib_dst)\n\
\tret",
    },
    "strlib_hex2str" => {
        deps: &["strlib_alloc_temp"],
        body: "\
strlib_hex2str:\n\
\t; hl = value; returns its upper-case hex rendering in hl\n\
\tld\t(strlib_hex2str_val),hl\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(strlib_dst),hl\n\
\tld\t(hl),4\n\
\tinc\thl\n\
\tld\ta,(strlib_hex2str_val+1)\n\
\tcall\tstrlib_hex2str_nibble_hi\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\ta,(strlib_hex2str_val+1)\n\
\tcall\tstrlib_hex2str_nibble_lo\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\ta,(strlib_hex2str_val)\n\
\tcall\tstrlib_hex2str_nibble_hi\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\ta,(strlib_hex2str_val)\n\
\tcall\tstrlib_hex2str_nibble_lo\n\
\tld\t(hl),a\n\
\tld\thl,(strlib_dst)\n\
\tret\n\
strlib_hex2str_nibble_hi:\n\
\trrca\n\
\trrca\n\
\trrca\n\
\trrca\n\
\tjr\tstrlib_hex2str_nibble\n\
strlib_hex2str_nibble_lo:\n\
\t; falls through into the shared nibble-to-ASCII conversion\n\
strlib_hex2str_nibble:\n\
\tand\t&0F\n\
\tcp\t10\n\
\tjr\tc,strlib_hex2str_nibble_digit\n\
\tadd\ta,'A'-10\n\
\tret\n\
strlib_hex2str_nibble_digit:\n\
\tadd\ta,'0'\n\
\tret",
    },
    "strlib_str2real" => {
        deps: &["int_to_real", "int_mul16_by10", "real_neg", "real_div"],
        body: "\
strlib_str2real:\n\
\t; hl = string buffer; returns the parsed value's 5-byte MBF address\n\
\t; in hl. No scientific notation; malformed input parses as far as it\n\
\t; can and stops there\n\
\tld\ta,(hl)\n\
\tld\t(strlib_str2real_remain),a\n\
\tinc\thl\n\
\tld\t(strlib_str2real_ptr),hl\n\
\txor\ta\n\
\tld\t(strlib_str2real_neg),a\n\
\tld\t(strlib_str2real_frac),a\n\
\tld\t(strlib_str2real_fracdigits),a\n\
\tld\thl,0\n\
\tld\t(strlib_str2real_acc),hl\n\
\tld\ta,(strlib_str2real_remain)\n\
\tor\ta\n\
\tjr\tz,strlib_str2real_finish\n\
\tld\thl,(strlib_str2real_ptr)\n\
\tld\ta,(hl)\n\
\tcp\t'-'\n\
\tjr\tnz,strlib_str2real_loop\n\
\tld\ta,1\n\
\tld\t(strlib_str2real_neg),a\n\
\tinc\thl\n\
\tld\t(strlib_str2real_ptr),hl\n\
\tld\ta,(strlib_str2real_remain)\n\
\tdec\ta\n\
\tld\t(strlib_str2real_remain),a\n\
strlib_str2real_loop:\n\
\tld\ta,(strlib_str2real_remain)\n\
\tor\ta\n\
\tjr\tz,strlib_str2real_finish\n\
\tld\thl,(strlib_str2real_ptr)\n\
\tld\ta,(hl)\n\
\tcp\t'.'\n\
\tjr\tnz,strlib_str2real_digit\n\
\tld\ta,1\n\
\tld\t(strlib_str2real_frac),a\n\
\tjr\tstrlib_str2real_next\n\
strlib_str2real_digit:\n\
\tcp\t'0'\n\
\tjr\tc,strlib_str2real_finish\n\
\tcp\t'9'+1\n\
\tjr\tnc,strlib_str2real_finish\n\
\tsub\t'0'\n\
\tld\tc,a\n\
\tld\thl,(strlib_str2real_acc)\n\
\tcall\tint_mul16_by10\n\
\tld\ta,l\n\
\tadd\ta,c\n\
\tld\tl,a\n\
\tjr\tnc,strlib_str2real_digit_store\n\
\tinc\th\n\
strlib_str2real_digit_store:\n\
\tld\t(strlib_str2real_acc),hl\n\
\tld\ta,(strlib_str2real_frac)\n\
\tor\ta\n\
\tjr\tz,strlib_str2real_next\n\
\tld\ta,(strlib_str2real_fracdigits)\n\
\tinc\ta\n\
\tld\t(strlib_str2real_fracdigits),a\n\
strlib_str2real_next:\n\
\tld\thl,(strlib_str2real_ptr)\n\
\tinc\thl\n\
\tld\t(strlib_str2real_ptr),hl\n\
\tld\ta,(strlib_str2real_remain)\n\
\tdec\ta\n\
\tld\t(strlib_str2real_remain),a\n\
\tjr\tstrlib_str2real_loop\n\
strlib_str2real_finish:\n\
\tld\thl,(strlib_str2real_acc)\n\
\tcall\tint_to_real\n\
\tld\ta,(strlib_str2real_neg)\n\
\tor\ta\n\
\tjr\tz,strlib_str2real_scale\n\
\tcall\treal_neg\n\
strlib_str2real_scale:\n\
\tld\ta,(strlib_str2real_fracdigits)\n\
\tor\ta\n\
\tjr\tz,strlib_str2real_ret\n\
\tld\tb,a\n\
strlib_str2real_scale_loop:\n\
\tpush\tbc\n\
\tex\tde,hl\n\
\tld\thl,mbf_ten\n\
\tcall\treal_div\n\
\tpop\tbc\n\
\tdjnz\tstrlib_str2real_scale_loop\n\
strlib_str2real_ret:\n\
\tret",
    },
    "strlib_real2str" => {
        deps: &["strlib_alloc_temp", "strlib_int2str", "real_to_int", "int_to_real", "real_sub", "real_mul"],
        body: "\
strlib_real2str:\n\
\t; hl = 5-byte MBF address; returns its decimal rendering in hl, with\n\
\t; up to 4 fractional digits and no trailing-zero trimming\n\
\tpush\thl\n\
\tinc\thl\n\
\tinc\thl\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tand\t&80\n\
\tld\t(strlib_real2str_neg),a\n\
\tpop\thl\n\
\tor\ta\n\
\tjr\tz,strlib_real2str_abs_ok\n\
\tld\tde,mbf_zero\n\
\tcall\treal_sub\n\
strlib_real2str_abs_ok:\n\
\tld\t(strlib_real2str_abs),hl\n\
\tcall\treal_to_int\n\
\tcall\tstrlib_int2str\n\
\tld\t(strlib_real2str_ipart_str),hl\n\
\tld\thl,(strlib_real2str_abs)\n\
\tcall\treal_to_int\n\
\tcall\tint_to_real\n\t; hl = intpart's real value (rhs for the subtraction)\n\
\tld\tde,(strlib_real2str_abs)\n\t; de = abs value (lhs)\n\
\tcall\treal_sub\n\t; hl = frac = abs - intpart\n\
\tld\t(strlib_real2str_frac),hl\n\
\tld\thl,strlib_real2str_fracbuf\n\
\tld\t(strlib_real2str_fracptr),hl\n\
\tld\tb,4\n\
strlib_real2str_frac_loop:\n\
\tld\thl,(strlib_real2str_frac)\n\
\tld\tde,mbf_ten\n\
\tcall\treal_mul\n\t; hl = frac * 10\n\
\tpush\thl\n\
\tcall\treal_to_int\n\t; hl = this digit's value, 0-9\n\
\tld\ta,l\n\
\tadd\ta,'0'\n\
\tld\t(strlib_real2str_digit),a\n\
\tld\tde,(strlib_real2str_fracptr)\n\
\tld\ta,(strlib_real2str_digit)\n\
\tld\t(de),a\n\
\tinc\tde\n\
\tld\t(strlib_real2str_fracptr),de\n\
\tcall\tint_to_real\n\t; hl = this digit's real value (rhs)\n\
\tpop\tde\n\t; de = frac * 10 (lhs)\n\
\tcall\treal_sub\n\t; hl = new frac = frac*10 - digit\n\
\tld\t(strlib_real2str_frac),hl\n\
\tdjnz\tstrlib_real2str_frac_loop\n\
\tcall\tstrlib_alloc_temp\n\
\tld\t(strlib_dst),hl\n\
\tinc\thl\n\t; length byte is filled in last\n\
\tld\tb,0\n\
\tld\ta,(strlib_real2str_neg)\n\
\tor\ta\n\
\tjr\tz,strlib_real2str_put_ipart\n\
\tld\t(hl),'-'\n\
\tinc\thl\n\
\tinc\tb\n\
strlib_real2str_put_ipart:\n\
\tld\tde,(strlib_real2str_ipart_str)\n\
\tld\ta,(de)\n\
\tld\tc,a\n\
\tld\ta,b\n\
\tadd\ta,c\n\
\tld\tb,a\n\
\tinc\tde\n\
\tld\ta,c\n\
\tor\ta\n\
\tjr\tz,strlib_real2str_put_point\n\
\tpush\tbc\n\
\tld\tb,c\n\
strlib_real2str_ipart_loop:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdjnz\tstrlib_real2str_ipart_loop\n\
\tpop\tbc\n\
strlib_real2str_put_point:\n\
\tld\t(hl),'.'\n\
\tinc\thl\n\
\tinc\tb\n\
\tld\tde,strlib_real2str_fracbuf\n\
\tld\tc,4\n\
strlib_real2str_frac_copy:\n\
\tld\ta,(de)\n\
\tld\t(hl),a\n\
\tinc\tde\n\
\tinc\thl\n\
\tdec\tc\n\
\tjr\tnz,strlib_real2str_frac_copy\n\
\tld\ta,b\n\
\tadd\ta,4\n\
\tld\tb,a\n\
\tld\thl,(strlib_dst)\n\
\tld\ta,b\n\
\tld\t(hl),a\n\
\tret",
    },
    "strlib_print_str" => {
        deps: &[],
        body: "\
strlib_print_str:\n\
\t; hl = string buffer; writes its bytes through TXT_OUTPUT\n\
\tld\ta,(hl)\n\
\tor\ta\n\
\tret\tz\n\
\tld\tb,a\n\
\tinc\thl\n\
strlib_print_str_loop:\n\
\tld\ta,(hl)\n\
\tpush\tbc\n\
\tpush\thl\n\
\tcall\t&BB5A\n\
\tpop\thl\n\
\tpop\tbc\n\
\tinc\thl\n\
\tdjnz\tstrlib_print_str_loop\n\
\tret",
    },
    "mem_copy5" => {
        deps: &[],
        body: "\
mem_copy5:\n\
\t; copies the 5-byte MBF value at hl into the fixed buffer at de\n\
\tld\tb,5\n\
mem_copy5_loop:\n\
\tld\ta,(hl)\n\
\tld\t(de),a\n\
\tinc\thl\n\
\tinc\tde\n\
\tdjnz\tmem_copy5_loop\n\
\tret",
    },
    "mem_copy_str" => {
        deps: &[],
        body: "\
mem_copy_str:\n\
\t; copies the length-prefixed string at hl into the fixed buffer at de\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\
\tld\t(de),a\n\
\tinc\thl\n\
\tinc\tde\n\
\tinc\tb\n\
mem_copy_str_loop:\n\
\tld\ta,(hl)\n\
\tld\t(de),a\n\
\tinc\thl\n\
\tinc\tde\n\
\tdjnz\tmem_copy_str_loop\n\
\tret",
    },
    "call_indirect" => {
        deps: &[],
        body: "\
call_indirect:\n\
\t; hl = target address; returns to the caller of call_indirect when the\n\
\t; callee executes ret\n\
\tjp\t(hl)",
    },
    "int_div16" => {
        deps: &[],
        body: "\
int_div16:\n\
\t; hl = dividend, de = divisor (both signed); quotient in hl, remainder in de\n\
\tld\tb,16\n\
\txor\ta\n\
int_div16_loop:\n\
\tadd\thl,hl\n\
\trla\n\
\tcp\te\n\
\tjr\tc,int_div16_skip\n\
\tsub\te\n\
\tinc\tl\n\
int_div16_skip:\n\
\tdjnz\tint_div16_loop\n\
\tld\te,a\n\
\tret",
    },
    "int_mul16" => {
        deps: &[],
        body: "\
int_mul16:\n\
\t; hl, de = signed 16-bit operands; low 16 bits of the product in hl\n\
\tld\tb,h\n\
\tld\tc,l\n\
\tld\thl,0\n\
\tld\ta,16\n\
int_mul16_loop:\n\
\tadd\thl,hl\n\
\tsla\tc\n\
\trl\tb\n\
\tjr\tnc,int_mul16_skip\n\
\tadd\thl,de\n\
int_mul16_skip:\n\
\tdec\ta\n\
\tjr\tnz,int_mul16_loop\n\
\tret",
    },
    "int_mod16" => {
        deps: &["int_div16"],
        body: "\
int_mod16:\n\
\t; hl = dividend, de = divisor; remainder in hl\n\
\tcall\tint_div16\n\
\tex\tde,hl\n\
\tret",
    },
    "div16_hlby10" => {
        deps: &[],
        body: "\
div16_hlby10:\n\
\t; hl = unsigned 16-bit value; returns the quotient in hl, remainder in a.\n\
\t; Restoring division by the constant 10, using real_work_m/real_work_e\n\
\t; as the shifting quotient/remainder pair (mirrors real_divhi16)\n\
\tld\t(real_work_m),hl\n\
\tld\thl,0\n\
\tld\t(real_work_e),hl\n\
\tld\tb,16\n\
div16_hlby10_loop:\n\
\tld\thl,(real_work_m)\n\
\tadd\thl,hl\n\
\tld\t(real_work_m),hl\n\
\tld\thl,(real_work_e)\n\
\tadc\thl,hl\n\
\tld\tde,10\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tjr\tc,div16_hlby10_restore\n\
\tld\t(real_work_e),hl\n\
\tld\tde,(real_work_m)\n\
\tset\t0,e\n\
\tld\t(real_work_m),de\n\
\tjr\tdiv16_hlby10_next\n\
div16_hlby10_restore:\n\
\tadd\thl,de\n\
\tld\t(real_work_e),hl\n\
div16_hlby10_next:\n\
\tdjnz\tdiv16_hlby10_loop\n\
\tld\thl,(real_work_m)\n\
\tld\ta,(real_work_e)\n\
\tret",
    },
    "int_mul16_by10" => {
        deps: &[],
        body: "\
int_mul16_by10:\n\
\t; hl = signed 16-bit value; returns hl*10 in hl\n\
\tadd\thl,hl\n\t; *2\n\
\tld\td,h\n\
\tld\te,l\n\
\tadd\thl,hl\n\t; *4\n\
\tadd\thl,hl\n\t; *8\n\
\tadd\thl,de\n\t; *8 + *2 = *10\n\
\tret",
    },
    "real_load_operands" => {
        deps: &[],
        body: "\
real_load_operands:\n\
\t; hl = operand A address, de = operand B address; decodes both into\n\
\t; real_ea/real_sa/real_ma (A) and real_eb/real_sb/real_mb (B): a\n\
\t; 16-bit working mantissa (top bits of the 32-bit MBF mantissa, with\n\
\t; the implied leading bit forced back into its top bit), an 8-bit\n\
\t; sign (&00 or &80), and the raw exponent byte (&00 means zero)\n\
\tld\t(real_pb),de\n\
\tinc\thl\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\t(real_ma),a\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\
\tand\t&80\n\
\tld\t(real_sa),a\n\
\tld\ta,b\n\
\tand\t&7F\n\
\tor\t&80\n\
\tld\t(real_ma+1),a\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\t(real_ea),a\n\
\tld\thl,(real_pb)\n\
\tinc\thl\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\t(real_mb),a\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\
\tand\t&80\n\
\tld\t(real_sb),a\n\
\tld\ta,b\n\
\tand\t&7F\n\
\tor\t&80\n\
\tld\t(real_mb+1),a\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\t(real_eb),a\n\
\tret",
    },
    "real_encode_result" => {
        deps: &["real_alloc_temp"],
        body: "\
real_encode_result:\n\
\t; encodes real_result_mant/real_result_sign/real_result_exp into a\n\
\t; fresh temp buffer, returned in hl; an exactly-zero mantissa\n\
\t; collapses to mbf_zero regardless of the other two cells\n\
\tld\thl,(real_result_mant)\n\
\tld\ta,h\n\
\tor\tl\n\
\tjr\tnz,real_encode_result_nonzero\n\
\tld\thl,mbf_zero\n\
\tret\n\
real_encode_result_nonzero:\n\
\tcall\treal_alloc_temp\n\
\tpush\thl\n\
\tld\t(hl),0\n\
\tinc\thl\n\
\tld\t(hl),0\n\
\tinc\thl\n\
\tld\ta,(real_result_mant)\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\ta,(real_result_mant+1)\n\
\tand\t&7F\n\
\tld\tb,a\n\
\tld\ta,(real_result_sign)\n\
\tor\tb\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\ta,(real_result_exp)\n\
\tld\t(hl),a\n\
\tpop\thl\n\
\tret",
    },
    "real_add" => {
        deps: &["real_load_operands", "real_encode_result"],
        body: "\
real_add:\n\
\t; hl, de = 5-byte MBF operand addresses (commutative); returns a\n\
\t; result address in hl\n\
\tld\t(real_pa),hl\n\
\tcall\treal_load_operands\n\
\tld\ta,(real_ea)\n\
\tor\ta\n\
\tjr\tz,real_add_ret_b\n\
\tld\ta,(real_eb)\n\
\tor\ta\n\
\tjr\tz,real_add_ret_a\n\
\tld\ta,(real_ea)\n\
\tld\tb,a\n\
\tld\ta,(real_eb)\n\
\tsub\tb\n\t; a = eb - ea\n\
\tjr\tz,real_add_aligned\n\
\tjr\tc,real_add_shiftB_setup\n\
\tld\tb,a\n\
\tld\ta,(real_eb)\n\
\tld\t(real_result_exp),a\n\
\tld\thl,(real_ma)\n\
real_add_shift_a:\n\
\tld\ta,b\n\
\tor\ta\n\
\tjr\tz,real_add_shift_a_done\n\
\tsrl\th\n\
\trr\tl\n\
\tdjnz\treal_add_shift_a\n\
real_add_shift_a_done:\n\
\tld\t(real_ma),hl\n\
\tjr\treal_add_combine\n\
real_add_shiftB_setup:\n\
\tneg\n\
\tld\tb,a\n\
\tld\ta,(real_ea)\n\
\tld\t(real_result_exp),a\n\
\tld\thl,(real_mb)\n\
real_add_shift_b:\n\
\tld\ta,b\n\
\tor\ta\n\
\tjr\tz,real_add_shift_b_done\n\
\tsrl\th\n\
\trr\tl\n\
\tdjnz\treal_add_shift_b\n\
real_add_shift_b_done:\n\
\tld\t(real_mb),hl\n\
\tjr\treal_add_combine\n\
real_add_aligned:\n\
\tld\ta,(real_ea)\n\
\tld\t(real_result_exp),a\n\
real_add_combine:\n\
\tld\ta,(real_sa)\n\
\tld\tb,a\n\
\tld\ta,(real_sb)\n\
\tcp\tb\n\
\tjr\tnz,real_add_diffsign\n\
\tld\ta,b\n\
\tld\t(real_result_sign),a\n\
\tld\thl,(real_ma)\n\
\tld\tde,(real_mb)\n\
\tadd\thl,de\n\
\tjr\tnc,real_add_store\n\
\trr\th\n\
\trr\tl\n\
\tld\ta,(real_result_exp)\n\
\tinc\ta\n\
\tld\t(real_result_exp),a\n\
\tjr\treal_add_store\n\
real_add_diffsign:\n\
\tld\thl,(real_ma)\n\
\tld\tde,(real_mb)\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tjr\tnc,real_add_diffsign_a_bigger\n\
\tld\thl,(real_mb)\n\
\tld\tde,(real_ma)\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tld\ta,(real_sb)\n\
\tld\t(real_result_sign),a\n\
\tjr\treal_add_norm\n\
real_add_diffsign_a_bigger:\n\
\tld\ta,(real_sa)\n\
\tld\t(real_result_sign),a\n\
real_add_norm:\n\
\tld\ta,h\n\
\tor\tl\n\
\tjr\tz,real_add_zero\n\
\tld\tb,16\n\
real_add_norm_loop:\n\
\tld\ta,h\n\
\tor\ta\n\
\tjp\tm,real_add_store\n\
\tadd\thl,hl\n\
\tld\ta,(real_result_exp)\n\
\tdec\ta\n\
\tld\t(real_result_exp),a\n\
\tdjnz\treal_add_norm_loop\n\
real_add_zero:\n\
\tld\thl,mbf_zero\n\
\tret\n\
real_add_store:\n\
\tld\t(real_result_mant),hl\n\
\tjp\treal_encode_result\n\
real_add_ret_a:\n\
\tld\thl,(real_pa)\n\
\tret\n\
real_add_ret_b:\n\
\tld\thl,(real_pb)\n\
\tret",
    },
    "real_sub" => {
        deps: &["real_add", "real_neg", "real_alloc_temp", "mem_copy5"],
        body: "\
real_sub:\n\
\t; hl = rhs address, de = lhs address; computes lhs - rhs\n\
\tpush\tde\n\t; save lhs address\n\
\tpush\thl\n\t; save rhs address\n\
\tcall\treal_alloc_temp\n\t; hl = fresh temp buffer\n\
\tex\tde,hl\n\t; de = temp buffer\n\
\tpop\thl\n\t; hl = rhs address (source)\n\
\tcall\tmem_copy5\n\t; copies rhs into the temp buffer at de\n\
\tex\tde,hl\n\t; hl = temp buffer (copy of rhs)\n\
\tcall\treal_neg\n\t; negate the copy's sign in place; hl unchanged\n\
\tpop\tde\n\t; de = lhs address\n\
\tjp\treal_add",
    },
    "real_mulhi16" => {
        deps: &[],
        body: "\
real_mulhi16:\n\
\t; bc = multiplicand, de = multiplier; returns the high 16 bits of the\n\
\t; unsigned 32-bit product in hl\n\
\tld\thl,0\n\
\tld\ta,16\n\
real_mulhi16_loop:\n\
\tadd\thl,hl\n\
\trl\te\n\
\trl\td\n\
\tjr\tnc,real_mulhi16_skip\n\
\tadd\thl,bc\n\
\tjr\tnc,real_mulhi16_skip\n\
\tinc\tde\n\
real_mulhi16_skip:\n\
\tdec\ta\n\
\tjr\tnz,real_mulhi16_loop\n\
\tex\tde,hl\n\
\tret",
    },
    "real_mul" => {
        deps: &["real_load_operands", "real_encode_result", "real_mulhi16"],
        body: "\
real_mul:\n\
\t; hl, de = 5-byte MBF operand addresses (commutative); returns a\n\
\t; result address in hl\n\
\tcall\treal_load_operands\n\
\tld\ta,(real_ea)\n\
\tor\ta\n\
\tjr\tz,real_mul_zero\n\
\tld\ta,(real_eb)\n\
\tor\ta\n\
\tjr\tz,real_mul_zero\n\
\tld\ta,(real_sa)\n\
\tld\tb,a\n\
\tld\ta,(real_sb)\n\
\txor\tb\n\
\tld\t(real_result_sign),a\n\
\tld\ta,(real_ea)\n\
\tld\tb,a\n\
\tld\ta,(real_eb)\n\
\tadd\ta,b\n\
\tsub\t128\n\
\tld\t(real_result_exp),a\n\
\tld\tbc,(real_ma)\n\
\tld\tde,(real_mb)\n\
\tcall\treal_mulhi16\n\
\tld\ta,h\n\
\tor\ta\n\
\tjp\tm,real_mul_store\n\
\tadd\thl,hl\n\
\tld\ta,(real_result_exp)\n\
\tdec\ta\n\
\tld\t(real_result_exp),a\n\
real_mul_store:\n\
\tld\t(real_result_mant),hl\n\
\tjp\treal_encode_result\n\
real_mul_zero:\n\
\tld\thl,mbf_zero\n\
\tret",
    },
    "real_divhi16" => {
        deps: &[],
        body: "\
real_divhi16:\n\
\t; hl = numerator, already reduced below the denominator preloaded\n\
\t; into real_div_divisor; returns a 16-bit quotient in hl\n\
\tld\t(real_div_quot),hl\n\
\tld\thl,0\n\
\tld\t(real_div_rem),hl\n\
\tld\tb,16\n\
real_divhi16_loop:\n\
\tld\thl,(real_div_quot)\n\
\tadd\thl,hl\n\
\tld\t(real_div_quot),hl\n\
\tld\thl,(real_div_rem)\n\
\tadc\thl,hl\n\
\tld\tde,(real_div_divisor)\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tjr\tc,real_divhi16_restore\n\
\tld\t(real_div_rem),hl\n\
\tld\tde,(real_div_quot)\n\
\tset\t0,e\n\
\tld\t(real_div_quot),de\n\
\tjr\treal_divhi16_next\n\
real_divhi16_restore:\n\
\tadd\thl,de\n\
\tld\t(real_div_rem),hl\n\
real_divhi16_next:\n\
\tdjnz\treal_divhi16_loop\n\
\tld\thl,(real_div_quot)\n\
\tret",
    },
    "real_div" => {
        deps: &["real_load_operands", "real_encode_result", "real_divhi16"],
        body: "\
real_div:\n\
\t; hl = divisor (rhs) address, de = dividend (lhs) address, per the\n\
\t; codegen's binary-op convention; division by zero yields zero\n\
\t; rather than raising a runtime error (see DESIGN.md)\n\
\tcall\treal_load_operands\n\t; real_ea/sa/ma = divisor, real_eb/sb/mb = dividend\n\
\tld\ta,(real_ea)\n\
\tor\ta\n\
\tjr\tz,real_div_zero\n\
\tld\ta,(real_eb)\n\
\tor\ta\n\
\tjr\tz,real_div_zero\n\
\tld\ta,(real_sa)\n\
\tld\tb,a\n\
\tld\ta,(real_sb)\n\
\txor\tb\n\
\tld\t(real_result_sign),a\n\
\tld\ta,(real_eb)\n\
\tld\tb,a\n\
\tld\ta,(real_ea)\n\
\tneg\n\
\tadd\ta,b\n\
\tadd\ta,128\n\
\tld\t(real_result_exp),a\n\
\tld\thl,(real_mb)\n\t; numerator = dividend mantissa\n\
\tld\tde,(real_ma)\n\t; denominator = divisor mantissa\n\
\tld\t(real_div_divisor),de\n\
\tor\ta\n\
\tsbc\thl,de\n\
\tadd\thl,de\n\t; undo the sbc; only its flags were needed\n\
\tjr\tc,real_div_no_halve\n\t; numerator already below the denominator\n\
\tsrl\th\n\
\trr\tl\n\
\tld\ta,(real_result_exp)\n\
\tinc\ta\n\
\tld\t(real_result_exp),a\n\
real_div_no_halve:\n\
\tcall\treal_divhi16\n\
\tld\ta,h\n\
\tor\ta\n\
\tjp\tm,real_div_store\n\
\tadd\thl,hl\n\
\tld\ta,(real_result_exp)\n\
\tdec\ta\n\
\tld\t(real_result_exp),a\n\
real_div_store:\n\
\tld\t(real_result_mant),hl\n\
\tjp\treal_encode_result\n\
real_div_zero:\n\
\tld\thl,mbf_zero\n\
\tret",
    },
    "real_pow" => {
        deps: &["real_mul", "real_to_int"],
        body: "\
real_pow:\n\
\t; hl = exponent address, de = base address, per the codegen's\n\
\t; binary-op convention; supports non-negative integer exponents\n\
\t; only, truncating anything else to 0 (yielding 1.0); exponents\n\
\t; above 255 are not supported and are masked to their low byte\n\
\tld\t(real_pow_base),de\n\
\tcall\treal_to_int\n\
\tld\ta,h\n\
\tor\ta\n\
\tjp\tm,real_pow_zero\n\
\tld\ta,l\n\
\tor\ta\n\
\tjr\tz,real_pow_zero\n\
\tld\tb,l\n\
\tld\thl,mbf_one\n\
\tld\t(real_pow_acc),hl\n\
real_pow_loop:\n\
\tld\thl,(real_pow_acc)\n\
\tld\tde,(real_pow_base)\n\
\tcall\treal_mul\n\
\tld\t(real_pow_acc),hl\n\
\tdjnz\treal_pow_loop\n\
\tld\thl,(real_pow_acc)\n\
\tret\n\
real_pow_zero:\n\
\tld\thl,mbf_one\n\
\tret",
    },
    "real_neg" => {
        deps: &[],
        body: "\
real_neg:\n\
\t; hl = 5-byte MBF operand address; flips its sign bit in place, returns hl\n\
\tpush\thl\n\
\tld\tde,3\n\
\tadd\thl,de\n\
\tld\ta,(hl)\n\
\txor\t&80\n\
\tld\t(hl),a\n\
\tpop\thl\n\
\tret",
    },
    "real_cmp" => {
        deps: &["real_sub"],
        body: "\
real_cmp:\n\
\t; hl, de = 5-byte MBF operand addresses; returns -1/0/1 in hl\n\
\tcall\treal_sub\n\
\tpush\thl\n\
\tld\tde,4\n\
\tadd\thl,de\n\
\tld\ta,(hl)\n\
\tor\ta\n\
\tpop\thl\n\
\tjr\tz,real_cmp_zero\n\
\tpush\thl\n\
\tld\tde,3\n\
\tadd\thl,de\n\
\tld\ta,(hl)\n\
\tpop\thl\n\
\tand\t&80\n\
\tjr\tnz,real_cmp_neg\n\
\tld\thl,1\n\
\tret\n\
real_cmp_neg:\n\
\tld\thl,-1\n\
\tret\n\
real_cmp_zero:\n\
\tld\thl,0\n\
\tret",
    },
    "real_round" => {
        deps: &["real_add", "real_sub"],
        body: "\
real_round:\n\
\t; hl = 5-byte MBF operand address; returns a new MBF address holding\n\
\t; the value biased towards the nearest integer (ties away from zero):\n\
\t; adds 0.5 for a non-negative value, subtracts 0.5 for a negative\n\
\t; one. Callers that need an actual integer result still need\n\
\t; real_to_int afterwards; this only applies the rounding bias\n\
\tpush\thl\n\
\tinc\thl\n\
\tinc\thl\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tand\t&80\n\
\tpop\thl\n\
\tjr\tnz,real_round_neg\n\
\tld\tde,mbf_half\n\
\tjp\treal_add\n\
real_round_neg:\n\
\tpush\thl\n\
\tpop\tde\n\
\tld\thl,mbf_half\n\
\tjp\treal_sub",
    },
    "real_to_int" => {
        deps: &[],
        body: "\
real_to_int:\n\
\t; hl = 5-byte MBF operand address; returns a truncated signed 16-bit\n\
\t; value in hl (ties are not rounded; see real_round)\n\
\tpush\thl\n\
\tinc\thl\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\t(real_work_m),a\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tld\tb,a\n\
\tand\t&80\n\
\tld\t(real_work_s),a\n\
\tld\ta,b\n\
\tand\t&7F\n\
\tor\t&80\n\
\tld\t(real_work_m+1),a\n\
\tinc\thl\n\
\tld\ta,(hl)\n\
\tpop\thl\n\
\tor\ta\n\
\tjr\tz,real_to_int_zero\n\
\tsub\t128\n\
\tsub\t16\n\t; a = (unbiased exponent) - 16\n\
\tld\thl,(real_work_m)\n\
\tjr\tz,real_to_int_sign\n\
\tjp\tp,real_to_int_left\n\
\tneg\n\
\tld\tb,a\n\
real_to_int_right:\n\
\tsrl\th\n\
\trr\tl\n\
\tdjnz\treal_to_int_right\n\
\tjr\treal_to_int_sign\n\
real_to_int_left:\n\
\tld\tb,a\n\
real_to_int_left_loop:\n\
\tld\ta,b\n\
\tor\ta\n\
\tjr\tz,real_to_int_sign\n\
\tadd\thl,hl\n\
\tdjnz\treal_to_int_left_loop\n\
real_to_int_sign:\n\
\tld\ta,(real_work_s)\n\
\tor\ta\n\
\tjr\tz,real_to_int_done\n\
\tld\ta,l\n\
\tcpl\n\
\tld\tl,a\n\
\tld\ta,h\n\
\tcpl\n\
\tld\th,a\n\
\tinc\thl\n\
real_to_int_done:\n\
\tret\n\
real_to_int_zero:\n\
\tld\thl,0\n\
\tret",
    },
    "int_to_real" => {
        deps: &["real_alloc_temp"],
        body: "\
int_to_real:\n\
\t; hl = signed 16-bit value; returns a 5-byte MBF address in hl\n\
\tld\ta,h\n\
\tor\tl\n\
\tjr\tz,int_to_real_zero\n\
\txor\ta\n\
\tld\t(real_work_s),a\n\
\tld\ta,h\n\
\tor\ta\n\
\tjp\tp,int_to_real_mag_ok\n\
\tld\ta,&80\n\
\tld\t(real_work_s),a\n\
\tld\ta,h\n\
\tcpl\n\
\tld\th,a\n\
\tld\ta,l\n\
\tcpl\n\
\tld\tl,a\n\
\tinc\thl\n\
int_to_real_mag_ok:\n\
\tld\t(real_work_m),hl\n\
\tld\ta,144\n\
\tld\t(real_work_e),a\n\
\tld\tb,16\n\
int_to_real_norm:\n\
\tld\ta,h\n\
\tor\ta\n\
\tjp\tm,int_to_real_store\n\
\tadd\thl,hl\n\
\tld\ta,(real_work_e)\n\
\tdec\ta\n\
\tld\t(real_work_e),a\n\
\tdjnz\tint_to_real_norm\n\
int_to_real_store:\n\
\tld\t(real_work_m),hl\n\
\tcall\treal_alloc_temp\n\
\tpush\thl\n\
\tld\t(hl),0\n\
\tinc\thl\n\
\tld\t(hl),0\n\
\tinc\thl\n\
\tld\ta,(real_work_m)\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\ta,(real_work_m+1)\n\
\tand\t&7F\n\
\tld\tb,a\n\
\tld\ta,(real_work_s)\n\
\tor\tb\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tld\ta,(real_work_e)\n\
\tld\t(hl),a\n\
\tpop\thl\n\
\tret\n\
int_to_real_zero:\n\
\tld\thl,mbf_zero\n\
\tret",
    },
    "input_to_lenstr" => {
        deps: &["strlib_alloc_temp"],
        body: "\
input_to_lenstr:\n\
\t; hl = zero-terminated buffer; returns a length-prefixed copy in hl\n\
\tpush\thl\n\
\tcall\tstrlib_alloc_temp\n\
\tpop\thl\n\
\tret",
    },
    "input_line" => {
        deps: &["strlib_str2real", "input_to_lenstr"],
        body: "\
input_line:\n\
\t; reads a CR-terminated line from the keyboard into input_buffer\n\
\tld\thl,input_buffer\n\
\tld\tb,0\n\
input_line_loop:\n\
\tcall\t&BB06\n\
\tcall\t&BB09\n\
\tcp\t13\n\
\tjr\tz,input_line_done\n\
\tld\t(hl),a\n\
\tinc\thl\n\
\tinc\tb\n\
\tjr\tinput_line_loop\n\
input_line_done:\n\
\tld\t(hl),0\n\
\tld\thl,input_buffer\n\
\tret",
    },
}

pub fn routine(name: &'static str) -> &'static Routine {
    CATALOG
        .get(name)
        .unwrap_or_else(|| panic!("runtime catalog has no routine named '{name}'"))
}
